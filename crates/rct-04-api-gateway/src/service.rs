//! Gateway service: wires the subsystems together and runs the HTTP server.

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

use rct_01_trial_registry::{
    InMemoryPatientStore, InMemorySiteStore, InMemoryStudyStore, InMemoryUserDirectory,
    InMemoryVariableStore, PatientService, RegistryService, SystemClock, UserDirectory,
    UserService,
};
use rct_02_assignment_ledger::{AuditRecorder, InMemoryAssignmentStore};
use rct_03_randomization::RandomizationService;
use shared_types::{Role, User, UserId};

use crate::adapters::{RecorderLedger, RegistryResolver};
use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::SessionStore;
use crate::router::{build_router, AppState};

/// The assembled gateway.
///
/// Construction wires every subsystem against the in-memory adapters and
/// optionally seeds a bootstrap admin account; [`start`](Self::start) then
/// serves until shutdown. Tests use [`router`](Self::router) to drive the
/// stack in process without a socket.
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiGatewayService {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;

        let studies = Arc::new(InMemoryStudyStore::new());
        let sites = Arc::new(InMemorySiteStore::new());
        let variables = Arc::new(InMemoryVariableStore::new());
        let patient_store = Arc::new(InMemoryPatientStore::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let assignments = Arc::new(InMemoryAssignmentStore::new());

        let registry = Arc::new(RegistryService::new(
            Arc::clone(&studies),
            Arc::clone(&sites),
            Arc::clone(&variables),
            SystemClock,
        ));
        let patients = Arc::new(PatientService::new(
            Arc::clone(&patient_store),
            Arc::clone(&studies),
            Arc::clone(&variables),
            SystemClock,
        ));
        let users = Arc::new(UserService::new(Arc::clone(&directory)));
        let recorder = Arc::new(AuditRecorder::new(Arc::clone(&assignments)));
        let randomizer = Arc::new(RandomizationService::new(
            RegistryResolver::new(Arc::clone(&registry)),
            RecorderLedger::new(Arc::clone(&recorder), SystemClock),
            config.rng_seed,
        ));
        let sessions = Arc::new(SessionStore::new(config.session_ttl));

        if let Some(admin) = &config.bootstrap_admin {
            bootstrap_admin(&directory, &admin.username, &admin.secret)?;
        }

        Ok(Self {
            config,
            state: AppState {
                registry,
                patients,
                users,
                recorder,
                randomizer,
                sessions,
            },
            shutdown_tx: None,
        })
    }

    /// The assembled router, for in-process tests and embedding.
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Serves until Ctrl+C or [`shutdown`](Self::shutdown).
    pub async fn start(&mut self) -> Result<(), GatewayError> {
        let router = self.router();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|err| GatewayError::Bind(err.to_string()))?;
        info!(addr = %self.config.bind_addr, "gateway listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_rx => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            })
            .await
            .map_err(|err| GatewayError::Internal(err.to_string()))?;

        info!("gateway stopped");
        Ok(())
    }

    /// Triggers graceful shutdown.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Creates the configured admin account unless the username is taken.
fn bootstrap_admin(
    directory: &Arc<InMemoryUserDirectory>,
    username: &str,
    secret: &str,
) -> Result<(), GatewayError> {
    let existing = directory
        .user_by_username(username)
        .map_err(|err| GatewayError::Internal(err.to_string()))?;
    if existing.is_some() {
        return Ok(());
    }

    directory
        .insert_user(
            User {
                id: UserId(0),
                username: username.to_string(),
                role: Role::Admin,
            },
            secret,
        )
        .map_err(|err| GatewayError::Internal(err.to_string()))?;

    info!(username = %username, "bootstrap admin created");
    Ok(())
}
