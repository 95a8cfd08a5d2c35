//! # Gateway Error Types
//!
//! [`ApiError`] is what a handler returns: an HTTP status plus the
//! `{message}` body every error in this API uses. Domain errors convert
//! into it via `From`, so handlers bubble with `?`.
//! [`GatewayError`] covers infrastructure failures (config, bind).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rct_01_trial_registry::RegistryError;
use rct_02_assignment_ledger::LedgerError;
use rct_03_randomization::RandomizationError;
use serde_json::json;
use std::fmt;

/// An HTTP-mapped error response.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status = match &err {
            RegistryError::StudyNotFound { .. }
            | RegistryError::SiteNotFound { .. }
            | RegistryError::PatientNotFound { .. }
            | RegistryError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            RegistryError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            RegistryError::NotRandomized { .. }
            | RegistryError::NoArmsDefined { .. }
            | RegistryError::DuplicateName { .. }
            | RegistryError::DuplicateSiteAssignment { .. }
            | RegistryError::SiteInUse { .. }
            | RegistryError::UnknownVariable { .. }
            | RegistryError::Validation { .. } => StatusCode::BAD_REQUEST,
            RegistryError::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.to_string())
    }
}

impl From<RandomizationError> for ApiError {
    fn from(err: RandomizationError) -> Self {
        let status = match &err {
            RandomizationError::NotFound { .. } => StatusCode::NOT_FOUND,
            RandomizationError::NotRandomized { .. }
            | RandomizationError::NoArmsDefined { .. }
            | RandomizationError::UnsupportedRandomizationType { .. } => StatusCode::BAD_REQUEST,
            RandomizationError::StaleClusterAssignment { .. } => StatusCode::CONFLICT,
            RandomizationError::AssignmentFailed => StatusCode::INTERNAL_SERVER_ERROR,
            RandomizationError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
    }
}

/// Gateway-level errors (not HTTP responses, internal use).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}
