pub mod bookings;
pub mod users;
pub mod catalog;
pub mod maintenance;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(bookings::routes())
        .merge(users::routes())
        .merge(catalog::routes())
        .merge(maintenance::routes())
}
