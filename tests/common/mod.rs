#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use reservation_system::config::{AppConfig, Config, DatabaseConfig, SweeperConfig};
use reservation_system::controllers;
use reservation_system::database::Database;
use reservation_system::services::reservations::ReservationEngine;
use reservation_system::AppState;

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            rust_log: "reservation_system=debug".to_string(),
        },
        database: DatabaseConfig {
            url: "unused in tests, the pool is injected".to_string(),
            pool_size: 5,
        },
        sweeper: SweeperConfig {
            enabled: false,
            interval_secs: 300,
        },
    }
}

/// Mirrors the router construction in `main.rs` so tests exercise the same
/// surface that production serves.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = Arc::new(AppState {
        db: Database { pool: pool.clone() },
        config: test_config(),
        engine: ReservationEngine::new(pool),
    });

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
}

/* ---------- fixtures ---------- */

pub async fn seed_user(pool: &PgPool, email: &str) {
    sqlx::query(
        "INSERT INTO users (email, first_name, last_name, password)
         VALUES ($1, 'Ada', 'Lovelace', 'generated')",
    )
    .bind(email)
    .execute(pool)
    .await
    .expect("seed user");
}

/// Movie + theater + showing + theater link. Returns the showing id.
pub async fn seed_show(pool: &PgPool) -> i64 {
    let movie_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO movies (title) VALUES ('Test Feature') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("seed movie");

    let theater_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO theaters (name) VALUES ('Screen One') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("seed theater");

    let show_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO shows (movie_id, show_date, start_time, end_time)
         VALUES ($1, '2026-01-15', '19:00', '21:00')
         RETURNING id",
    )
    .bind(movie_id)
    .fetch_one(pool)
    .await
    .expect("seed show");

    sqlx::query("INSERT INTO plays (show_id, theater_id) VALUES ($1, $2)")
        .bind(show_id)
        .bind(theater_id)
        .execute(pool)
        .await
        .expect("seed plays");

    show_id
}

pub async fn seed_seat(pool: &PgPool, show_id: i64, seat_no: i32, price: i64) {
    sqlx::query("INSERT INTO show_seats (show_id, seat_no, price) VALUES ($1, $2, $3)")
        .bind(show_id)
        .bind(seat_no)
        .bind(price)
        .execute(pool)
        .await
        .expect("seed seat");
}

/* ---------- assertions helpers ---------- */

pub async fn seat_owner(pool: &PgPool, show_id: i64, seat_no: i32) -> Option<i64> {
    sqlx::query_scalar::<_, Option<i64>>(
        "SELECT booking_id FROM show_seats WHERE show_id = $1 AND seat_no = $2",
    )
    .bind(show_id)
    .bind(seat_no)
    .fetch_one(pool)
    .await
    .expect("seat row must exist")
}

/// (status, seat_count) of a booking, or None if the row is gone.
pub async fn booking_row(pool: &PgPool, booking_id: i64) -> Option<(String, i32)> {
    sqlx::query_as::<_, (String, i32)>(
        "SELECT status, seat_count FROM bookings WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_optional(pool)
    .await
    .expect("booking query")
}

pub async fn bookings_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
        .fetch_one(pool)
        .await
        .expect("count bookings")
}

pub async fn owned_seat_count(pool: &PgPool, booking_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM show_seats WHERE booking_id = $1")
        .bind(booking_id)
        .fetch_one(pool)
        .await
        .expect("count owned seats")
}

/* ---------- HTTP helpers ---------- */

pub async fn get_path(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body must be JSON")
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
