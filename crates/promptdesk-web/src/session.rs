//! Session verification.
//!
//! The proxy only ever learns who a caller is by handing the session token
//! from the [`SESSION_COOKIE`] cookie to a [`SessionVerifier`]. Anything
//! else the client sends, an `Authorization` header included, is ignored
//! for identity purposes.

use std::collections::HashMap;

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use futures::future::BoxFuture;
use promptdesk::{SESSION_COOKIE, UserId};
use serde::Deserialize;
use tracing::{debug, warn};

/// Resolves a session token to a verified user.
pub trait SessionVerifier: Send + Sync {
    /// `None` means the token does not identify anyone.
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Option<UserId>>;
}

/// Pull the session token out of the request's `Cookie` header(s).
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Fixed token → user table, for development and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticSessions {
    sessions: HashMap<String, UserId>,
}

impl StaticSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl Into<String>, user: UserId) -> Self {
        self.sessions.insert(token.into(), user);
        self
    }

    /// Parse `TOKEN=USER` pairs as given on the command line.
    pub fn parse<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let mut sessions = Self::new();
        for pair in pairs {
            let (token, user) = pair
                .split_once('=')
                .ok_or_else(|| format!("invalid session '{pair}': expected TOKEN=USER"))?;
            let (token, user) = (token.trim(), user.trim());
            if token.is_empty() || user.is_empty() {
                return Err(format!("invalid session '{pair}': empty token or user"));
            }
            sessions = sessions.with(token, UserId::new(user));
        }
        Ok(sessions)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionVerifier for StaticSessions {
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Option<UserId>> {
        Box::pin(async move { self.sessions.get(token).cloned() })
    }
}

/// Asks an external auth service who a token belongs to.
///
/// Sends `GET {auth_url}/user` with `Authorization: Bearer <token>` and
/// expects `{"id": "..."}`. Any transport error, non-success status, or
/// unexpected body counts as "not authenticated".
pub struct RemoteSessions {
    client: reqwest::Client,
    user_url: String,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
}

impl RemoteSessions {
    pub fn new(auth_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("promptdesk-web/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            user_url: format!("{}/user", auth_url.trim_end_matches('/')),
        })
    }

    async fn lookup(&self, token: &str) -> Option<UserId> {
        let resp = match self
            .client
            .get(&self.user_url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("auth service unreachable: {e}");
                return None;
            }
        };
        if !resp.status().is_success() {
            debug!("auth service rejected session: HTTP {}", resp.status());
            return None;
        }
        match resp.json::<AuthUser>().await {
            Ok(user) if !user.id.is_empty() => Some(UserId::new(user.id)),
            Ok(_) => None,
            Err(e) => {
                warn!("auth service returned an unexpected body: {e}");
                None
            }
        }
    }
}

impl SessionVerifier for RemoteSessions {
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Option<UserId>> {
        Box::pin(self.lookup(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let h = headers(&["theme=dark; promptdesk_session=abc123; lang=zh"]);
        assert_eq!(session_token(&h), Some("abc123"));
    }

    #[test]
    fn finds_session_in_second_cookie_header() {
        let h = headers(&["theme=dark", "promptdesk_session=xyz"]);
        assert_eq!(session_token(&h), Some("xyz"));
    }

    #[test]
    fn ignores_authorization_and_empty_values() {
        let mut h = headers(&["promptdesk_session="]);
        h.insert(AUTHORIZATION, HeaderValue::from_static("Bearer u1"));
        assert_eq!(session_token(&h), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn parse_static_sessions() {
        let sessions = StaticSessions::parse(["tok-a=u1", " tok-b = u2 "]).unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(StaticSessions::parse(["nouser"]).is_err());
        assert!(StaticSessions::parse(["=u1"]).is_err());
    }

    #[tokio::test]
    async fn static_sessions_verify() {
        let sessions = StaticSessions::new().with("tok", UserId::new("u1"));
        assert_eq!(sessions.verify("tok").await, Some(UserId::new("u1")));
        assert_eq!(sessions.verify("other").await, None);
    }

    #[test]
    fn remote_sessions_user_url() {
        let remote = RemoteSessions::new("http://auth.local/auth/v1/").unwrap();
        assert_eq!(remote.user_url, "http://auth.local/auth/v1/user");
    }
}
