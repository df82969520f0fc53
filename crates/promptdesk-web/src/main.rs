//! Run the prompt proxy.
//!
//! # Usage
//!
//! ```bash
//! # Development: fixed session tokens
//! BACKEND_URL=http://localhost:8000 cargo run -p promptdesk-web -- \
//!     --session dev-token=u1 --session other-token=u2
//!
//! # Behind a real auth service
//! BACKEND_URL=http://localhost:8000 AUTH_URL=https://auth.example.com/auth/v1 \
//!     cargo run -p promptdesk-web -- --port 8080 --static-dir ./web/out
//! ```
//!
//! Then, from the page (or curl):
//!
//! ```bash
//! curl -b promptdesk_session=dev-token http://127.0.0.1:3001/api/prompt
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use promptdesk::{BACKEND_URL_ENV, BackendConfig, HttpBackend};
use promptdesk_web::{RemoteSessions, SessionVerifier, StaticSessions, WebConfig, spawn_web};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Authenticating proxy for the custom prompt backend.
#[derive(Parser)]
#[command(name = "promptdesk-web")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Base URL of the upstream prompt backend.
    #[arg(long, env = BACKEND_URL_ENV)]
    backend_url: String,

    /// Auth service that verifies session tokens (`GET {url}/user`).
    #[arg(long, env = "AUTH_URL", conflicts_with = "sessions")]
    auth_url: Option<String>,

    /// Fixed session as TOKEN=USER. Repeatable.
    #[arg(long = "session", value_name = "TOKEN=USER")]
    sessions: Vec<String>,

    /// Serve a built settings page from this directory.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let backend = match HttpBackend::new(BackendConfig::new(&args.backend_url)) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: failed to create backend client: {e}");
            process::exit(1);
        }
    };
    info!("forwarding to {}", backend.endpoint());

    let sessions: Arc<dyn SessionVerifier> = match args.auth_url {
        Some(ref url) => match RemoteSessions::new(url) {
            Ok(remote) => {
                info!("verifying sessions against {url}");
                Arc::new(remote)
            }
            Err(e) => {
                eprintln!("Error: failed to create auth client: {e}");
                process::exit(1);
            }
        },
        None => match StaticSessions::parse(args.sessions.iter().map(String::as_str)) {
            Ok(sessions) => {
                if sessions.is_empty() {
                    warn!("no --session or --auth-url given; every request will be unauthorized");
                } else {
                    info!("{} fixed session(s) configured", sessions.len());
                }
                Arc::new(sessions)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(2);
            }
        },
    };

    let config = WebConfig {
        bind_addr: (args.host, args.port).into(),
        static_dir: args.static_dir,
    };

    let addr = match spawn_web(Arc::new(backend), sessions, config).await {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Error: failed to bind: {e}");
            process::exit(1);
        }
    };
    info!("listening on http://{addr}");

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
    }
    info!("shutting down");
}
