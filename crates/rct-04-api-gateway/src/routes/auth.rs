//! Login and logout.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{Actor, Role};
use tracing::{info, warn};

use crate::domain::error::ApiError;
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
    pub token: String,
}

/// `POST /login`
///
/// Unknown users and wrong secrets are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .authenticate(&request.username, &request.secret)?
        .ok_or_else(|| {
            warn!(username = %request.username, "login rejected");
            ApiError::unauthorized("Invalid credentials")
        })?;

    let token = state
        .sessions
        .issue(Actor::new(user.id, user.role), Utc::now());

    info!(user_id = %user.id, role = user.role.as_str(), "login succeeded");
    Ok(Json(LoginResponse {
        success: true,
        role: user.role,
        token,
    }))
}

/// `POST /api/logout` — revokes the caller's session token.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        state.sessions.revoke(token);
    }
    Json(json!({ "success": true }))
}
