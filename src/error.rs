use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Typed outcome of a failed reservation operation.
///
/// Every engine call returns one of these kinds; raw storage errors never
/// reach a caller. None of the kinds terminate the process.
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("account {0} not found")]
    AccountNotFound(String),

    #[error("showing {0} not found")]
    ShowingNotFound(i64),

    #[error("booking {0} not found")]
    BookingNotFound(i64),

    /// The listed seat numbers do not exist in the showing's seat map.
    #[error("seat(s) {seats:?} do not exist for showing {show_id}")]
    SeatNotFound { show_id: i64, seats: Vec<i32> },

    /// The listed seats are currently owned by a different booking.
    #[error("seat(s) {seats:?} already booked")]
    SeatAlreadyBooked { seats: Vec<i32> },

    #[error("at least one seat must be selected")]
    EmptySeatSet,

    #[error("seat {0} selected more than once")]
    DuplicateSeat(i32),

    /// Reassignment must be price-neutral; both totals are in minor units.
    #[error("price mismatch: current total {current}, new total {requested}")]
    PriceMismatch { current: i64, requested: i64 },

    /// The store could not serialize the transaction. Nothing was
    /// committed; the same call is safe to retry.
    #[error("transaction conflict, safe to retry")]
    Conflict,

    #[error("storage unavailable: {0}")]
    Store(sqlx::Error),
}

pub type ReservationResult<T> = Result<T, ReservationError>;

impl From<sqlx::Error> for ReservationError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            // 40001 serialization_failure, 40P01 deadlock_detected
            if matches!(db_err.code().as_deref(), Some("40001") | Some("40P01")) {
                return ReservationError::Conflict;
            }
        }
        ReservationError::Store(err)
    }
}

// Seat conflicts answer with 419, same convention the booking API has
// always used for "already taken".
fn status_419() -> StatusCode {
    StatusCode::from_u16(419).unwrap_or(StatusCode::CONFLICT)
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> Response {
        let (status, seats) = match &self {
            ReservationError::AccountNotFound(_)
            | ReservationError::ShowingNotFound(_)
            | ReservationError::BookingNotFound(_) => (StatusCode::NOT_FOUND, None),
            ReservationError::SeatNotFound { seats, .. } => {
                (StatusCode::NOT_FOUND, Some(seats.clone()))
            }
            ReservationError::SeatAlreadyBooked { seats } => {
                (status_419(), Some(seats.clone()))
            }
            ReservationError::EmptySeatSet | ReservationError::DuplicateSeat(_) => {
                (StatusCode::BAD_REQUEST, None)
            }
            ReservationError::PriceMismatch { .. } | ReservationError::Conflict => {
                (StatusCode::CONFLICT, None)
            }
            ReservationError::Store(e) => {
                tracing::error!("store error: {:?}", e);
                (StatusCode::SERVICE_UNAVAILABLE, None)
            }
        };

        let mut body = json!({ "error": self.to_string() });
        if let Some(seats) = seats {
            body["seats"] = json!(seats);
        }
        if matches!(self, ReservationError::Conflict) {
            body["retryable"] = json!(true);
        }

        (status, Json(body)).into_response()
    }
}
