//! Tower middleware for the gateway.

pub mod auth;

pub use auth::{AuthLayer, SessionStore, TokenState};
