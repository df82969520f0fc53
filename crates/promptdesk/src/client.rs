//! Page-side client of the proxy's `/api/prompt` surface.

use reqwest::header::COOKIE;
use reqwest::{Method, RequestBuilder};
use tracing::debug;

use crate::{
    API_PROMPT_PATH, API_SESSION_PATH, PromptBody, PromptUpdate, RequestError, RequestFuture,
    SESSION_COOKIE, SessionBody, UserId, join_url,
};

/// What the settings page needs from the server.
///
/// Calls are made on behalf of whatever session the implementation carries;
/// the page never passes identity itself.
pub trait PromptApi: Send + Sync {
    /// Current prompt text. No override reads as the empty string.
    fn fetch(&self) -> RequestFuture<'_, String>;

    /// Store `prompt` as the user's override.
    fn save<'a>(&'a self, prompt: &'a str) -> RequestFuture<'a, ()>;

    /// Drop the override so the backend default applies again.
    fn reset(&self) -> RequestFuture<'_, ()>;
}

/// HTTP client for a running `promptdesk-web` proxy.
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
    session: Option<String>,
}

impl ProxyClient {
    /// Create a client for the proxy at `base_url`, optionally authenticated
    /// with a session token.
    pub fn new(base_url: impl Into<String>, session: Option<String>) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("promptdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            session: session.filter(|s| !s.is_empty()),
        })
    }

    /// Ask the proxy who the session belongs to.
    ///
    /// Returns `Ok(None)` when the proxy rejects the session (HTTP 401), so
    /// the page can treat "not logged in" as a state rather than an error.
    pub async fn current_user(&self) -> Result<Option<UserId>, RequestError> {
        match self.exchange(Method::GET, API_SESSION_PATH, None).await {
            Ok(text) => {
                let body: SessionBody = serde_json::from_str(&text)?;
                Ok(Some(body.id))
            }
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, join_url(&self.base_url, path));
        match self.session {
            Some(ref token) => req.header(COOKIE, format!("{SESSION_COOKIE}={token}")),
            None => req,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<&PromptUpdate>,
    ) -> Result<String, RequestError> {
        let mut req = self.request(method.clone(), path);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!("proxy {} {}: HTTP {}", method, path, status);
        if !status.is_success() {
            return Err(RequestError::Status { status, body: text });
        }
        Ok(text)
    }
}

impl PromptApi for ProxyClient {
    fn fetch(&self) -> RequestFuture<'_, String> {
        Box::pin(async move {
            let text = self.exchange(Method::GET, API_PROMPT_PATH, None).await?;
            let body: PromptBody = serde_json::from_str(&text)?;
            Ok(body.into_text())
        })
    }

    fn save<'a>(&'a self, prompt: &'a str) -> RequestFuture<'a, ()> {
        Box::pin(async move {
            let update = PromptUpdate::text(prompt);
            self.exchange(Method::POST, API_PROMPT_PATH, Some(&update))
                .await?;
            Ok(())
        })
    }

    fn reset(&self) -> RequestFuture<'_, ()> {
        Box::pin(async move {
            self.exchange(Method::DELETE, API_PROMPT_PATH, None).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_is_treated_as_none() {
        let client = ProxyClient::new("http://127.0.0.1:3001", Some(String::new())).unwrap();
        assert!(client.session.is_none());
    }

    #[test]
    fn session_travels_as_cookie() {
        let client = ProxyClient::new("http://127.0.0.1:3001/", Some("tok-1".into())).unwrap();
        let req = client.request(Method::GET, API_PROMPT_PATH).build().unwrap();
        assert_eq!(req.url().as_str(), "http://127.0.0.1:3001/api/prompt");
        assert_eq!(
            req.headers().get(COOKIE).unwrap(),
            "promptdesk_session=tok-1"
        );
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
