use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ReservationError;
use crate::models::BookingStatus;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/reassign", patch(reassign_booking))
        .route("/bookings/cancel", patch(cancel_booking))
}

/* ---------- BOOKINGS ---------- */

// A booking can only enter the system as Pending or Confirmed; accepting
// Cancelled here would create a booking that must own zero seats.
#[derive(Debug, Clone, Copy, Deserialize)]
enum CreateStatus {
    Pending,
    Confirmed,
}

impl From<CreateStatus> for BookingStatus {
    fn from(s: CreateStatus) -> Self {
        match s {
            CreateStatus::Pending => BookingStatus::Pending,
            CreateStatus::Confirmed => BookingStatus::Confirmed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    show_id: i64,
    seats: Vec<i32>,
    email: String,
    status: Option<CreateStatus>,
}

#[derive(Debug, Serialize)]
struct CreateBookingResponse {
    id: i64,
}

// POST /api/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ReservationError> {
    let status = req.status.unwrap_or(CreateStatus::Pending).into();
    let id = state
        .engine
        .book(req.show_id, &req.seats, &req.email, status)
        .await?;
    Ok((StatusCode::CREATED, Json(CreateBookingResponse { id })))
}

#[derive(Debug, Deserialize)]
struct ReassignRequest {
    booking_id: i64,
    seats: Vec<i32>,
}

// PATCH /api/bookings/reassign
async fn reassign_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReassignRequest>,
) -> Result<impl IntoResponse, ReservationError> {
    state.engine.reassign(req.booking_id, &req.seats).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Seats reassigned"})),
    ))
}

#[derive(Debug, Deserialize)]
struct CancelBookingRequest {
    booking_id: i64,
}

// PATCH /api/bookings/cancel
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, ReservationError> {
    state.engine.release_booking(req.booking_id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Booking cancelled"})),
    ))
}
