//! # RCT-04 API Gateway - role-gated HTTP interface for RCT-Manager.
//!
//! This crate provides the public HTTP API over the registry, ledger, and
//! randomization subsystems.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      API GATEWAY (rct-04)                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │   POST /login                  (credential check, token out)  │
//! │   /api/* behind bearer-token middleware                       │
//! │        │                                                      │
//! │  ┌─────┴───────────────────────────────────┐                  │
//! │  │   Middleware: Trace → Timeout → Auth    │                  │
//! │  └─────┬───────────────────────────────────┘                  │
//! │        │ Extension<Actor>                                     │
//! │  ┌─────┴───────────────────────────────────┐                  │
//! │  │ handlers → policy table → services      │                  │
//! │  └─────┬──────────────┬────────────┬───────┘                  │
//! └────────┼──────────────┼────────────┼──────────────────────────┘
//!          ▼              ▼            ▼
//!   rct-01-registry  rct-02-ledger  rct-03-randomization
//! ```
//!
//! # Authorization
//!
//! Every caller resolves to an [`shared_types::Actor`] (user id + role);
//! handlers consult the closed policy table before touching a service, and
//! the services enforce the same rules again at the domain seam. Denial is
//! a 403 with a `{message}` body, like every other error in this API.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod service;

pub use domain::config::{BootstrapAdmin, GatewayConfig};
pub use domain::error::{ApiError, GatewayError};
pub use middleware::{AuthLayer, SessionStore};
pub use router::AppState;
pub use service::ApiGatewayService;
