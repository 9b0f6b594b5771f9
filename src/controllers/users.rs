use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(create_user))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateUserRequest {
    #[validate(length(min = 1, message = "first name cannot be empty"))]
    first_name: String,
    #[validate(length(min = 1, message = "last name cannot be empty"))]
    last_name: String,
    #[validate(email(message = "invalid e-mail"))]
    email: String,
    #[validate(length(equal = 10, message = "phone number must be 10 digits"))]
    phone: Option<String>,
}

// POST /api/users
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }
    if let Some(ref phone) = req.phone {
        if !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err((StatusCode::BAD_REQUEST, "phone number must be 10 digits".to_string()));
        }
    }

    let existing = User::find_by_email(&req.email, &state.db).await.map_err(|e| {
        tracing::error!("create_user lookup error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user".to_string())
    })?;
    if existing.is_some() {
        return Err((StatusCode::CONFLICT, "E-mail already registered".to_string()));
    }

    // Accounts get a generated credential; there is no login flow here.
    let password = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, first_name, last_name, phone, password)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(&req.email)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.phone)
    .bind(&password)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("create_user sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user".to_string())
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}
