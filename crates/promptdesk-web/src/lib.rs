//! Authenticating proxy in front of the custom prompt backend.
//!
//! `promptdesk-web` provides an axum server exposing `/api/prompt` to the
//! settings page. Each request is authenticated from its session cookie,
//! then forwarded to the upstream backend with a credential derived from
//! the verified user, never from anything the client claims.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use promptdesk::{BackendConfig, HttpBackend, UserId};
//! use promptdesk_web::{StaticSessions, WebConfig, spawn_web};
//!
//! let backend = Arc::new(HttpBackend::new(BackendConfig::new("http://localhost:8000"))?);
//! let sessions = Arc::new(StaticSessions::new().with("dev-token", UserId::new("u1")));
//! let addr = spawn_web(backend, sessions, WebConfig::default()).await?;
//! println!("Proxy: http://{addr}");
//! ```
//!
//! # Failure semantics
//!
//! | Situation | Status | Body |
//! |-----------|--------|------|
//! | No cookie, unknown or rejected session | 401 | `{"error":"Unauthorized"}` |
//! | Upstream non-2xx, network error, non-JSON body | 500 | `{"error":"Internal server error"}` |
//!
//! A 401 is decided before the upstream backend is contacted.

mod api;
mod error;
mod server;
pub mod session;

pub use api::{AppState, VerifiedUser};
pub use error::{ApiError, INTERNAL_ERROR, UNAUTHORIZED};
pub use server::build_router;
pub use session::{RemoteSessions, SessionVerifier, StaticSessions, session_token};

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use promptdesk::PromptBackend;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// Directory with a built settings page to serve for non-API paths.
    ///
    /// If `None`, only the API is served — the front end runs separately.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            static_dir: None,
        }
    }
}

/// Spawn the proxy on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
///
/// # Arguments
///
/// * `backend` — Upstream prompt backend the proxy forwards to.
/// * `sessions` — Verifier that turns session cookies into users.
/// * `config` — Server configuration.
pub async fn spawn_web(
    backend: Arc<dyn PromptBackend>,
    sessions: Arc<dyn SessionVerifier>,
    config: WebConfig,
) -> io::Result<SocketAddr> {
    let router = build_router(AppState { backend, sessions }, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
