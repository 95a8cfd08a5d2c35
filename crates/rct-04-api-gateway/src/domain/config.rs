//! Gateway configuration.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::error::GatewayError;

/// Credentials for the account created at startup when the directory would
/// otherwise be empty.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub secret: String,
}

/// API Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP bind address.
    pub bind_addr: SocketAddr,
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// Session token lifetime.
    pub session_ttl: Duration,
    /// Fixed RNG seed for the randomization service. Leave `None` in
    /// production; set for reproducible test deployments.
    pub rng_seed: Option<u64>,
    /// Optional admin account created at startup.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("static addr"),
            request_timeout: Duration::from_secs(30),
            session_ttl: Duration::from_secs(2 * 60 * 60),
            rng_seed: None,
            bootstrap_admin: None,
        }
    }
}

impl GatewayConfig {
    /// Builds a configuration from the environment, falling back to
    /// defaults:
    ///
    /// - `RCT_BIND_ADDR` - e.g. `0.0.0.0:8080`
    /// - `RCT_REQUEST_TIMEOUT_SECS`
    /// - `RCT_SESSION_TTL_SECS`
    /// - `RCT_RNG_SEED`
    /// - `RCT_ADMIN_USER` / `RCT_ADMIN_SECRET`
    pub fn from_env() -> Result<Self, GatewayError> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("RCT_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|_| GatewayError::Config(format!("invalid RCT_BIND_ADDR: {}", addr)))?;
        }
        if let Ok(secs) = std::env::var("RCT_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                GatewayError::Config(format!("invalid RCT_REQUEST_TIMEOUT_SECS: {}", secs))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(secs) = std::env::var("RCT_SESSION_TTL_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                GatewayError::Config(format!("invalid RCT_SESSION_TTL_SECS: {}", secs))
            })?;
            config.session_ttl = Duration::from_secs(secs);
        }
        if let Ok(seed) = std::env::var("RCT_RNG_SEED") {
            let seed: u64 = seed
                .parse()
                .map_err(|_| GatewayError::Config(format!("invalid RCT_RNG_SEED: {}", seed)))?;
            config.rng_seed = Some(seed);
        }
        if let (Ok(username), Ok(secret)) = (
            std::env::var("RCT_ADMIN_USER"),
            std::env::var("RCT_ADMIN_SECRET"),
        ) {
            config.bootstrap_admin = Some(BootstrapAdmin { username, secret });
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.request_timeout.is_zero() {
            return Err(GatewayError::Config(
                "request_timeout must be positive".to_string(),
            ));
        }
        if self.session_ttl.is_zero() {
            return Err(GatewayError::Config(
                "session_ttl must be positive".to_string(),
            ));
        }
        if let Some(admin) = &self.bootstrap_admin {
            if admin.username.trim().is_empty() || admin.secret.is_empty() {
                return Err(GatewayError::Config(
                    "bootstrap admin requires username and secret".to_string(),
                ));
            }
        }
        Ok(())
    }
}
