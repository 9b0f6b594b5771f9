use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use std::sync::Arc;

use crate::error::ReservationError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/maintenance/releasePending", post(release_pending))
        .route("/maintenance/purgeCancelled", post(purge_cancelled))
}

// POST /api/maintenance/releasePending
async fn release_pending(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ReservationError> {
    let released = state.engine.release_stale_pending().await?;
    Ok(Json(serde_json::json!({ "released": released })))
}

// POST /api/maintenance/purgeCancelled
async fn purge_cancelled(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ReservationError> {
    let removed = state.engine.purge_cancelled().await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}
