//! Router assembly and shared application state.
//!
//! The gateway binds the in-memory adapters; a deployment with a relational
//! store swaps the aliases below and nothing else changes.

use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use rct_01_trial_registry::{
    InMemoryPatientStore, InMemorySiteStore, InMemoryStudyStore, InMemoryUserDirectory,
    InMemoryVariableStore, PatientService, RegistryService, SystemClock, UserService,
};
use rct_02_assignment_ledger::{AuditRecorder, InMemoryAssignmentStore};
use rct_03_randomization::RandomizationService;

use crate::adapters::{RecorderLedger, RegistryResolver};
use crate::domain::config::GatewayConfig;
use crate::middleware::{AuthLayer, SessionStore};
use crate::routes;

pub type GatewayRegistry = RegistryService<
    Arc<InMemoryStudyStore>,
    Arc<InMemorySiteStore>,
    Arc<InMemoryVariableStore>,
    SystemClock,
>;
pub type GatewayPatients = PatientService<
    Arc<InMemoryPatientStore>,
    Arc<InMemoryStudyStore>,
    Arc<InMemoryVariableStore>,
    SystemClock,
>;
pub type GatewayUsers = UserService<Arc<InMemoryUserDirectory>>;
pub type GatewayRecorder = AuditRecorder<Arc<InMemoryAssignmentStore>>;
pub type GatewayRandomizer = RandomizationService<
    RegistryResolver<
        Arc<InMemoryStudyStore>,
        Arc<InMemorySiteStore>,
        Arc<InMemoryVariableStore>,
        SystemClock,
    >,
    RecorderLedger<Arc<InMemoryAssignmentStore>, SystemClock>,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GatewayRegistry>,
    pub patients: Arc<GatewayPatients>,
    pub users: Arc<GatewayUsers>,
    pub recorder: Arc<GatewayRecorder>,
    pub randomizer: Arc<GatewayRandomizer>,
    pub sessions: Arc<SessionStore>,
}

/// Builds the full router: `/login` and `/health` open, everything under
/// `/api` behind the bearer-token layer.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let api = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route(
            "/users",
            post(routes::users::create).get(routes::users::list),
        )
        .route(
            "/users/:id/reset-secret",
            post(routes::users::reset_secret),
        )
        .route(
            "/sites",
            post(routes::sites::create).get(routes::sites::list),
        )
        .route(
            "/sites/:id",
            put(routes::sites::update).delete(routes::sites::remove),
        )
        .route(
            "/sites/:id/assignments",
            get(routes::randomization::site_assignments),
        )
        .route(
            "/studies",
            post(routes::studies::create).get(routes::studies::list),
        )
        .route("/studies/assign", post(routes::studies::assign_site))
        .route(
            "/studies/:id",
            get(routes::studies::get)
                .put(routes::studies::update)
                .delete(routes::studies::remove),
        )
        .route(
            "/studies/:id/arms",
            post(routes::studies::add_arm).get(routes::studies::arms),
        )
        .route(
            "/studies/:id/variables",
            post(routes::studies::define_variable).get(routes::studies::variables),
        )
        .route("/studies/:id/patients", get(routes::patients::list_for_study))
        .route("/patients", post(routes::patients::enroll))
        .route("/patients/:id", get(routes::patients::detail))
        .route(
            "/patients/:id/assignments",
            get(routes::randomization::patient_assignments),
        )
        .route("/randomize", post(routes::randomization::randomize))
        .layer(AuthLayer::new(Arc::clone(&state.sessions)));

    Router::new()
        .route("/login", post(routes::auth::login))
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .with_state(state)
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
