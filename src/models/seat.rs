use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Price is carried in minor currency units so parity checks stay exact.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShowSeat {
    pub show_id: i64,
    pub seat_no: i32,
    pub price: i64,
    pub booking_id: Option<i64>,
}
