//! HTTP route handlers.
//!
//! Handlers are thin: deserialize the payload, consult the policy table
//! where the operation is not already gated inside a service, call the
//! service, map the result to a response. All domain errors convert into
//! [`crate::domain::error::ApiError`] and bubble with `?`.

pub mod auth;
pub mod patients;
pub mod randomization;
pub mod sites;
pub mod studies;
pub mod users;
