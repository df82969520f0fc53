//! Client for the upstream prompt backend.
//!
//! The backend owns storage and default-prompt logic. It identifies the
//! caller purely by `Authorization: Bearer <user-id>`, so callers must only
//! ever pass a [`UserId`] that came out of session verification.

use std::time::{Duration, Instant};

use reqwest::{Method, Response};
use tracing::debug;

use crate::{PromptUpdate, RequestError, RequestFuture, UPSTREAM_PROMPT_PATH, UserId, join_url};

/// The upstream operations the proxy forwards to.
///
/// Implemented by [`HttpBackend`]; tests substitute in-memory fakes.
pub trait PromptBackend: Send + Sync {
    /// `GET /prompt` — the upstream JSON body, untouched.
    fn fetch<'a>(&'a self, user: &'a UserId) -> RequestFuture<'a, serde_json::Value>;

    /// `POST /prompt` with `update` as the body.
    fn save<'a>(&'a self, user: &'a UserId, update: &'a PromptUpdate) -> RequestFuture<'a, ()>;

    /// `DELETE /prompt` — revert to the backend default.
    fn reset<'a>(&'a self, user: &'a UserId) -> RequestFuture<'a, ()>;
}

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Whole-request timeout. Default: `None` (the HTTP client's own default).
    pub timeout: Option<Duration>,
    /// User-Agent sent upstream.
    pub user_agent: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Read the base URL from [`BACKEND_URL_ENV`](crate::BACKEND_URL_ENV).
    pub fn from_env() -> Option<Self> {
        std::env::var(crate::BACKEND_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout: None,
            user_agent: concat!("promptdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Async HTTP client for the upstream `/prompt` resource.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, RequestError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            endpoint: join_url(&config.base_url, UPSTREAM_PROMPT_PATH),
        })
    }

    /// The full URL of the upstream prompt resource.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(
        &self,
        method: Method,
        user: &UserId,
        body: Option<&PromptUpdate>,
    ) -> Result<Response, RequestError> {
        let start = Instant::now();
        let mut req = self
            .client
            .request(method.clone(), &self.endpoint)
            .header(reqwest::header::AUTHORIZATION, user.bearer());
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        debug!(
            "upstream {} {}: HTTP {} in {:.0}ms",
            method,
            self.endpoint,
            status,
            start.elapsed().as_secs_f64() * 1000.0
        );

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RequestError::Status { status, body });
        }
        Ok(resp)
    }
}

impl PromptBackend for HttpBackend {
    fn fetch<'a>(&'a self, user: &'a UserId) -> RequestFuture<'a, serde_json::Value> {
        Box::pin(async move {
            let resp = self.send(Method::GET, user, None).await?;
            let text = resp.text().await?;
            Ok(serde_json::from_str(&text)?)
        })
    }

    fn save<'a>(&'a self, user: &'a UserId, update: &'a PromptUpdate) -> RequestFuture<'a, ()> {
        Box::pin(async move {
            self.send(Method::POST, user, Some(update)).await?;
            Ok(())
        })
    }

    fn reset<'a>(&'a self, user: &'a UserId) -> RequestFuture<'a, ()> {
        Box::pin(async move {
            self.send(Method::DELETE, user, None).await?;
            Ok(())
        })
    }
}
