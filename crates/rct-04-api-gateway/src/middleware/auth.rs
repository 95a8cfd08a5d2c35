//! Bearer-token authentication middleware.
//!
//! `/login` issues an opaque session token; every `/api` request must carry
//! it as `Authorization: Bearer <token>`. The middleware resolves the token
//! to an [`Actor`] and injects it as a request extension for handlers.
//!
//! Token wire format is deliberately opaque (a uuid, not a signed claim):
//! the session table is the source of truth and revocation is immediate.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use shared_types::Actor;
use std::sync::Arc;
use std::time::Duration;
use tower::{Layer, Service};
use tracing::{debug, warn};
use uuid::Uuid;

/// One live session.
#[derive(Debug, Clone)]
struct Session {
    actor: Actor,
    expires_at: DateTime<Utc>,
}

/// Outcome of a token lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid(Actor),
    Expired,
    Unknown,
}

/// In-memory session-token table.
pub struct SessionStore {
    tokens: DashMap<String, Session>,
    ttl: ChronoDuration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::hours(2)),
        }
    }

    /// Issues a fresh token for an authenticated actor.
    pub fn issue(&self, actor: Actor, now: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(
            token.clone(),
            Session {
                actor,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Resolves a token. Expired tokens are removed on sight.
    pub fn resolve(&self, token: &str, now: DateTime<Utc>) -> TokenState {
        // The map guard must be dropped before the removal below.
        {
            match self.tokens.get(token) {
                Some(session) if session.expires_at > now => {
                    return TokenState::Valid(session.actor);
                }
                Some(_) => {}
                None => return TokenState::Unknown,
            }
        }
        self.tokens.remove(token);
        TokenState::Expired
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.remove(token);
    }
}

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    sessions: Arc<SessionStore>,
}

impl AuthLayer {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    sessions: Arc<SessionStore>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let sessions = Arc::clone(&self.sessions);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = bearer_token(&req);

            let Some(token) = token else {
                return Ok(unauthorized_response("Token is missing!"));
            };

            match sessions.resolve(&token, Utc::now()) {
                TokenState::Valid(actor) => {
                    debug!(user_id = %actor.user_id, role = actor.role.as_str(), "request authenticated");
                    req.extensions_mut().insert(actor);
                    inner.call(req).await
                }
                TokenState::Expired => {
                    warn!("rejected expired session token");
                    Ok(unauthorized_response("Token has expired!"))
                }
                TokenState::Unknown => {
                    warn!("rejected unknown session token");
                    Ok(unauthorized_response("Invalid token!"))
                }
            }
        })
    }
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let body = serde_json::json!({ "message": message });

    let mut response = Response::new(Body::from(serde_json::to_vec(&body).unwrap_or_default()));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response
        .headers_mut()
        .insert("Content-Type", "application/json".parse().expect("static"));
    response
        .headers_mut()
        .insert("WWW-Authenticate", "Bearer".parse().expect("static"));

    response
}
