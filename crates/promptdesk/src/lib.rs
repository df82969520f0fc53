//! Custom assistant prompt settings: shared types, HTTP clients, and the
//! settings page controller.
//!
//! A user may override the system prompt an AI assistant runs with. The
//! prompt itself lives in an external backend service; this crate holds
//! everything both sides of the proxy need to talk about it:
//!
//! - [`backend`] — [`HttpBackend`], the upstream client used by the proxy.
//!   Every request carries `Authorization: Bearer <user-id>` built from a
//!   verified [`UserId`].
//! - [`client`] — [`ProxyClient`], the page-side client of the proxy's
//!   `/api/prompt` surface. Identifies itself with a session cookie.
//! - [`settings`] — [`SettingsPage`](settings::SettingsPage), a headless
//!   controller for the edit buffer with Load / Save / Reset actions and
//!   toast notifications. Frontends render its shared state.
//!
//! # Architecture
//!
//! ```text
//! SettingsPage ──ProxyClient──▶ /api/prompt (promptdesk-web) ──HttpBackend──▶ upstream /prompt
//!      │
//!      └──▶ Arc<Mutex<SettingsState>> ◀──reads── frontend (CLI, TUI)
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use promptdesk::ProxyClient;
//! use promptdesk::settings::{SettingsPage, ToastBuffer};
//!
//! let client = Arc::new(ProxyClient::new("http://127.0.0.1:3001", Some("tok".into()))?);
//! let toasts = ToastBuffer::new();
//! let page = SettingsPage::new(client.clone(), Arc::new(toasts.clone()));
//! page.sign_in(client.current_user().await?);
//! page.load().await;
//! page.set_prompt("You are a helpful assistant.");
//! page.save().await;
//! ```

pub mod backend;
pub mod client;
mod error;
mod prompt;
pub mod settings;

pub use backend::{BackendConfig, HttpBackend, PromptBackend};
pub use client::{PromptApi, ProxyClient};
pub use error::RequestError;
pub use prompt::{ErrorBody, PromptBody, PromptUpdate, SessionBody, SuccessBody, UserId};

use futures::future::BoxFuture;

// ── Constants ──────────────────────────────────────────────────────

/// Environment variable holding the upstream backend base URL.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Path of the prompt resource on the upstream backend.
pub const UPSTREAM_PROMPT_PATH: &str = "/prompt";

/// Path of the prompt resource on the proxy.
pub const API_PROMPT_PATH: &str = "/api/prompt";

/// Path the proxy answers "who is this session" on.
pub const API_SESSION_PATH: &str = "/api/session";

/// Cookie carrying the opaque session token from the page to the proxy.
pub const SESSION_COOKIE: &str = "promptdesk_session";

/// Default address of the proxy, used by the CLI and TUI.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3001";

/// Boxed future returned by the HTTP-facing traits in this crate.
pub type RequestFuture<'a, T> = BoxFuture<'a, Result<T, RequestError>>;

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_strips_trailing_slash() {
        assert_eq!(
            join_url("http://backend:8000/", UPSTREAM_PROMPT_PATH),
            "http://backend:8000/prompt"
        );
        assert_eq!(
            join_url("http://backend:8000", API_PROMPT_PATH),
            "http://backend:8000/api/prompt"
        );
    }
}
