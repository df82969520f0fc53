use reqwest::StatusCode;
use thiserror::Error;

/// Failure of an HTTP exchange with the upstream backend or the proxy.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request never produced a response (connect, DNS, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The peer answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The response body was not the JSON we expected.
    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// Status code of a non-success response, if that is what this is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the peer rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
