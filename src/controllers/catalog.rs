use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::Showing;
use crate::store;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/catalog/showings", post(create_showing))
}

/* ---------- CATALOG ---------- */

#[derive(Debug, Deserialize)]
struct MovieSpec {
    title: String,
    release_date: Option<NaiveDate>,
    country: Option<String>,
    description: Option<String>,
    duration_minutes: Option<i32>,
    language: Option<String>,
    genre: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeatSpec {
    seat_no: i32,
    price: i64,
}

#[derive(Debug, Deserialize)]
struct CreateShowingRequest {
    theater_id: i64,
    movie: MovieSpec,
    show_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    seats: Vec<SeatSpec>,
}

#[derive(Debug, Serialize)]
struct CreateShowingResponse {
    movie_id: i64,
    showing: Showing,
    seats_created: usize,
}

// POST /api/catalog/showings
//
// Inserts the movie, the showing, the theater link, and the seat map in
// one transaction. Seat prices are fixed here and never change afterwards.
async fn create_showing(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateShowingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.movie.title.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Movie title cannot be empty".to_string()));
    }
    let mut seat_nos: Vec<i32> = req.seats.iter().map(|s| s.seat_no).collect();
    seat_nos.sort_unstable();
    if seat_nos.windows(2).any(|w| w[0] == w[1]) {
        return Err((StatusCode::BAD_REQUEST, "Duplicate seat number in seat map".to_string()));
    }
    if req.seats.iter().any(|s| s.price < 0) {
        return Err((StatusCode::BAD_REQUEST, "Seat price cannot be negative".to_string()));
    }

    let mut tx = state.db.pool.begin().await.map_err(internal)?;

    let theater_ok = store::theater_exists(&mut *tx, req.theater_id)
        .await
        .map_err(internal)?;
    if !theater_ok {
        return Err((StatusCode::NOT_FOUND, "Theater does not exist".to_string()));
    }

    let movie_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO movies (title, release_date, country, description, duration_minutes, language, genre)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(&req.movie.title)
    .bind(req.movie.release_date)
    .bind(&req.movie.country)
    .bind(&req.movie.description)
    .bind(req.movie.duration_minutes)
    .bind(&req.movie.language)
    .bind(&req.movie.genre)
    .fetch_one(&mut *tx)
    .await
    .map_err(internal)?;

    let showing = sqlx::query_as::<_, Showing>(
        "INSERT INTO shows (movie_id, show_date, start_time, end_time)
         VALUES ($1, $2, $3, $4)
         RETURNING id, movie_id, show_date, start_time, end_time",
    )
    .bind(movie_id)
    .bind(req.show_date)
    .bind(req.start_time)
    .bind(req.end_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(internal)?;

    sqlx::query("INSERT INTO plays (show_id, theater_id) VALUES ($1, $2)")
        .bind(showing.id)
        .bind(req.theater_id)
        .execute(&mut *tx)
        .await
        .map_err(internal)?;

    for seat in &req.seats {
        sqlx::query("INSERT INTO show_seats (show_id, seat_no, price) VALUES ($1, $2, $3)")
            .bind(showing.id)
            .bind(seat.seat_no)
            .bind(seat.price)
            .execute(&mut *tx)
            .await
            .map_err(internal)?;
    }

    tx.commit().await.map_err(internal)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateShowingResponse {
            movie_id,
            showing,
            seats_created: req.seats.len(),
        }),
    ))
}

fn internal(e: sqlx::Error) -> (StatusCode, String) {
    tracing::error!("create_showing sql error: {:?}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create showing".to_string())
}
