//! Axum server setup and router construction.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::routing::get;
use promptdesk::{API_PROMPT_PATH, API_SESSION_PATH};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - `GET|POST|DELETE /api/prompt`
/// - `GET /api/session`
/// - Optional static files for a built settings page
pub fn build_router(app_state: AppState, static_dir: Option<PathBuf>) -> Router {
    // CORS layer for development (front end dev server on a different port).
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            API_PROMPT_PATH,
            get(api::get_prompt)
                .post(api::post_prompt)
                .delete(api::delete_prompt),
        )
        .route(API_SESSION_PATH, get(api::get_session))
        .with_state(app_state);

    let mut router = api_routes
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Bind the listener, start serving on a Tokio task, and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("server error: {e}");
        }
    });

    Ok(addr)
}
