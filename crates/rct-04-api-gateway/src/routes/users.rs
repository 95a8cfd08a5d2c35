//! User account management (admin only; enforced by the user service).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{Actor, User, UserId};

use crate::domain::error::ApiError;
use crate::router::AppState;

/// `POST /api/users`
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(new): Json<rct_01_trial_registry::NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.create_user(actor, new)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /api/users`
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users(actor)?))
}

#[derive(Debug, Deserialize)]
pub struct ResetSecretRequest {
    pub secret: String,
}

/// `POST /api/users/:id/reset-secret`
pub async fn reset_secret(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<u64>,
    Json(request): Json<ResetSecretRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .users
        .reset_secret(actor, UserId(user_id), &request.secret)?;
    Ok(Json(json!({ "success": true })))
}
