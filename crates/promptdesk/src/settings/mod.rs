//! Headless settings page for the custom prompt.
//!
//! The page is a text editor bound to one string plus two actions. All of
//! its observable state lives in [`SettingsState`] behind an
//! `Arc<Mutex<_>>`, so any frontend can render it while [`SettingsPage`]
//! drives the network side:
//!
//! ```text
//! frontend ──save()/reset()/load()──▶ SettingsPage ──PromptApi──▶ proxy
//!     ▲                                   │
//!     └──reads── Arc<Mutex<SettingsState>> ◀──writes──┘
//!                                          └──Toast──▶ Notifier
//! ```
//!
//! Each action ends in exactly one toast (success or error, never both),
//! except a skipped load and a refused (busy) action, which are silent.
//! At most one action is in flight at a time.
//! The state lock is never held across an `.await`.

mod messages;
mod notify;

pub use messages::{Locale, Messages, Notice};
pub use notify::{MAX_TOASTS, Notifier, TOAST_TRIM_TO, Toast, ToastBuffer, ToastVariant};

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::{PromptApi, UserId};

/// The two user-triggered actions, plus the initial load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    Load,
    Save,
    Reset,
}

/// Whether a load, save or reset is outstanding.
///
/// Both action controls and the editor are disabled while this is
/// `InFlight`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight(PageAction),
}

impl RequestState {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// How an action ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The request succeeded; a success toast was raised (load raises none).
    Succeeded,
    /// The request failed; an error toast was raised.
    Failed,
    /// No user identity; the "not logged in" toast was raised, nothing sent.
    NotLoggedIn,
    /// Another action is in flight; nothing happened.
    Busy,
    /// Load without a user identity; nothing happened.
    Skipped,
}

impl ActionOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Page state shared between the controller and a frontend.
#[derive(Debug, Default)]
pub struct SettingsState {
    /// Authenticated user, if any.
    pub user: Option<UserId>,
    /// The edit buffer. Empty means "no override".
    pub prompt: String,
    pub request: RequestState,
    /// Set by a frontend when the user leaves the page.
    pub quit_requested: bool,
}

impl SettingsState {
    /// Whether the Save / Reset controls and the editor accept input.
    pub fn actions_enabled(&self) -> bool {
        self.request.is_idle()
    }
}

/// Lock the shared state, recovering from a poisoned mutex.
pub fn lock_state(state: &Mutex<SettingsState>) -> MutexGuard<'_, SettingsState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Controller for the prompt settings page.
///
/// Cheap to clone; clones share state, API client, and notifier.
#[derive(Clone)]
pub struct SettingsPage {
    state: Arc<Mutex<SettingsState>>,
    api: Arc<dyn PromptApi>,
    notifier: Arc<dyn Notifier>,
    messages: &'static Messages,
}

impl SettingsPage {
    pub fn new(api: Arc<dyn PromptApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SettingsState::default())),
            api,
            notifier,
            messages: Messages::for_locale(Locale::default()),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.messages = Messages::for_locale(locale);
        self
    }

    /// Share an existing state handle instead of a fresh one.
    pub fn with_state(mut self, state: Arc<Mutex<SettingsState>>) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &Arc<Mutex<SettingsState>> {
        &self.state
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    /// Record the authenticated user (or its absence).
    pub fn sign_in(&self, user: Option<UserId>) {
        lock_state(&self.state).user = user;
    }

    pub fn prompt(&self) -> String {
        lock_state(&self.state).prompt.clone()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        lock_state(&self.state).prompt = prompt.into();
    }

    pub fn request_state(&self) -> RequestState {
        lock_state(&self.state).request
    }

    /// Fetch the stored prompt into the edit buffer.
    ///
    /// Does nothing without a user, and is refused while another action is
    /// in flight. The load itself holds the in-flight flag, so the buffer
    /// cannot be edited or submitted until it lands. On failure the buffer
    /// is left as it was and an error toast is raised.
    pub async fn load(&self) -> ActionOutcome {
        {
            let mut s = lock_state(&self.state);
            if s.user.is_none() {
                debug!("prompt load skipped: no user");
                return ActionOutcome::Skipped;
            }
            if !s.request.is_idle() {
                debug!("Load ignored: {:?} in flight", s.request);
                return ActionOutcome::Busy;
            }
            s.request = RequestState::InFlight(PageAction::Load);
        }

        let result = self.api.fetch().await;
        match result {
            Ok(text) => {
                let mut s = lock_state(&self.state);
                s.prompt = text;
                s.request = RequestState::Idle;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                self.finish();
                warn!("Error fetching prompt: {e}");
                self.notifier.notify(Toast::error(self.messages.load_failed));
                ActionOutcome::Failed
            }
        }
    }

    /// Submit the edit buffer as the user's prompt.
    ///
    /// The buffer keeps what the user typed whatever the outcome.
    pub async fn save(&self) -> ActionOutcome {
        let prompt = match self.begin(PageAction::Save) {
            Ok(()) => lock_state(&self.state).prompt.clone(),
            Err(outcome) => return outcome,
        };

        let result = self.api.save(&prompt).await;
        self.finish();

        match result {
            Ok(()) => {
                self.notifier
                    .notify(Toast::success(self.messages.save_succeeded));
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!("Error saving prompt: {e}");
                self.notifier.notify(Toast::error(self.messages.save_failed));
                ActionOutcome::Failed
            }
        }
    }

    /// Drop the user's override and show what the backend now reports.
    ///
    /// On success the buffer is cleared, then refreshed from the server. A
    /// failed refresh is only logged: the reset itself succeeded, and one
    /// action raises one toast.
    pub async fn reset(&self) -> ActionOutcome {
        if let Err(outcome) = self.begin(PageAction::Reset) {
            return outcome;
        }

        if let Err(e) = self.api.reset().await {
            self.finish();
            warn!("Error resetting prompt: {e}");
            self.notifier.notify(Toast::error(self.messages.reset_failed));
            return ActionOutcome::Failed;
        }

        lock_state(&self.state).prompt.clear();
        match self.api.fetch().await {
            Ok(text) => lock_state(&self.state).prompt = text,
            Err(e) => warn!("Error refreshing prompt after reset: {e}"),
        }
        self.finish();

        self.notifier
            .notify(Toast::success(self.messages.reset_succeeded));
        ActionOutcome::Succeeded
    }

    /// Gate an action: refuse while busy, require a user, then mark in flight.
    fn begin(&self, action: PageAction) -> Result<(), ActionOutcome> {
        let mut s = lock_state(&self.state);
        if !s.request.is_idle() {
            debug!("{action:?} ignored: {:?} in flight", s.request);
            return Err(ActionOutcome::Busy);
        }
        if s.user.is_none() {
            drop(s);
            self.notifier
                .notify(Toast::error(self.messages.not_logged_in));
            return Err(ActionOutcome::NotLoggedIn);
        }
        s.request = RequestState::InFlight(action);
        Ok(())
    }

    fn finish(&self) {
        lock_state(&self.state).request = RequestState::Idle;
    }
}
