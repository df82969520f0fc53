//! Client-visible failure taxonomy of the proxy.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptdesk::{ErrorBody, RequestError};
use thiserror::Error;
use tracing::error;

/// Body text for 401 responses.
pub const UNAUTHORIZED: &str = "Unauthorized";
/// Body text for every 500 response. Upstream detail never leaks into it.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Why a proxied request failed.
///
/// Callers can only tell two things apart: 401 (no verified session) and
/// 500 (anything else).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no verified session")]
    Unauthorized,
    #[error("upstream {op} failed: {source}")]
    Upstream {
        op: &'static str,
        #[source]
        source: RequestError,
    },
    #[error("request body is not JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ApiError {
    pub fn upstream(op: &'static str) -> impl FnOnce(RequestError) -> Self {
        move |source| Self::Upstream { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Upstream { .. } | Self::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Unauthorized => UNAUTHORIZED,
            ref other => {
                error!("{other}");
                INTERNAL_ERROR
            }
        };
        (self.status(), Json(ErrorBody::new(message))).into_response()
    }
}
