//! REST handlers for `/api/prompt` and `/api/session`.
//!
//! Every handler takes a [`VerifiedUser`]; axum resolves it before the body
//! is read, so an unauthenticated request is answered with 401 without ever
//! reaching the upstream backend.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use promptdesk::{PromptBackend, PromptUpdate, SessionBody, SuccessBody, UserId};
use tracing::debug;

use crate::error::ApiError;
use crate::session::{SessionVerifier, session_token};

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn PromptBackend>,
    pub sessions: Arc<dyn SessionVerifier>,
}

/// The caller's identity, as established by the session verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser(pub UserId);

impl FromRequestParts<AppState> for VerifiedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, ApiError> {
        let token = session_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        match app.sessions.verify(token).await {
            Some(user) => Ok(Self(user)),
            None => {
                debug!("session rejected for {} {}", parts.method, parts.uri.path());
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// GET /api/prompt — Relay the upstream prompt body verbatim.
pub async fn get_prompt(
    State(app): State<AppState>,
    VerifiedUser(user): VerifiedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let body = app
        .backend
        .fetch(&user)
        .await
        .map_err(ApiError::upstream("fetch"))?;
    Ok(Json(body))
}

/// POST /api/prompt — Forward `{prompt}` upstream.
///
/// The body only has to be JSON; the `prompt` member is passed on as is and
/// the backend decides whether it is acceptable.
pub async fn post_prompt(
    State(app): State<AppState>,
    VerifiedUser(user): VerifiedUser,
    body: Bytes,
) -> Result<Json<SuccessBody>, ApiError> {
    let json: serde_json::Value = serde_json::from_slice(&body)?;
    let update = PromptUpdate::from_json(&json);
    app.backend
        .save(&user, &update)
        .await
        .map_err(ApiError::upstream("save"))?;
    Ok(Json(SuccessBody::OK))
}

/// DELETE /api/prompt — Revert to the backend default.
pub async fn delete_prompt(
    State(app): State<AppState>,
    VerifiedUser(user): VerifiedUser,
) -> Result<Json<SuccessBody>, ApiError> {
    app.backend
        .reset(&user)
        .await
        .map_err(ApiError::upstream("reset"))?;
    Ok(Json(SuccessBody::OK))
}

/// GET /api/session — Who the session belongs to.
pub async fn get_session(VerifiedUser(user): VerifiedUser) -> Json<SessionBody> {
    Json(SessionBody { id: user })
}
