//! Terminal settings page for the custom assistant prompt.
//!
//! Renders the shared [`SettingsState`] from `promptdesk` with ratatui +
//! crossterm: a multi-line editor bound to the prompt buffer, Save / Reset
//! controls that grey out while a request is in flight, and transient
//! toasts drained from a [`ToastBuffer`].
//!
//! The TUI never talks to the network. Key presses that trigger an action
//! are sent as [`PageCommand`]s; the caller runs them against its
//! [`SettingsPage`](promptdesk::settings::SettingsPage) on the Tokio runtime.
//!
//! # Quick start
//!
//! ```ignore
//! use promptdesk_tui::{PageCommand, TuiConfig, spawn_tui};
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let handle = spawn_tui(page.state().clone(), tx, TuiConfig::new(toasts, page.messages()));
//! while let Some(cmd) = rx.recv().await {
//!     let page = page.clone();
//!     tokio::spawn(async move {
//!         match cmd {
//!             PageCommand::Save => { page.save().await; }
//!             PageCommand::Reset => { page.reset().await; }
//!             PageCommand::Reload => { page.load().await; }
//!         }
//!     });
//! }
//! handle.join().ok();
//! ```

use std::io;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::execute;
use promptdesk::settings::{Locale, Messages, SettingsState, ToastBuffer, lock_state};
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

mod app;
mod editor;
mod input;
mod render;

use app::App;
use input::handle_key_event;
use render::render;

/// An action requested from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageCommand {
    Save,
    Reset,
    Reload,
}

/// Configuration for the TUI.
pub struct TuiConfig {
    /// Toasts raised by the page controller.
    pub toasts: ToastBuffer,
    /// Page copy in the chosen language.
    pub messages: &'static Messages,
    /// How long a toast stays on screen. Default: 4s.
    pub toast_ttl: Duration,
}

impl TuiConfig {
    pub fn new(toasts: ToastBuffer, messages: &'static Messages) -> Self {
        Self {
            toasts,
            messages,
            toast_ttl: Duration::from_secs(4),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self::new(ToastBuffer::new(), Messages::for_locale(Locale::default()))
    }
}

/// Spawn the TUI on a dedicated OS thread.
///
/// The TUI runs until the user quits or `quit_requested` is set. Dropping
/// out of the loop drops `commands`, which lets the caller's receive loop end.
pub fn spawn_tui(
    state: Arc<Mutex<SettingsState>>,
    commands: UnboundedSender<PageCommand>,
    config: TuiConfig,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_tui(&state, &commands, &config) {
            eprintln!("TUI error: {e}");
        }
    })
}

/// Run the TUI event loop (blocking). Call this from a dedicated OS thread.
pub fn run_tui(
    state: &Mutex<SettingsState>,
    commands: &UnboundedSender<PageCommand>,
    config: &TuiConfig,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new();

    let result = event_loop(&mut terminal, &mut app, state, commands, config);

    // Restore terminal even if the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    state: &Mutex<SettingsState>,
    commands: &UnboundedSender<PageCommand>,
    config: &TuiConfig,
) -> io::Result<()> {
    loop {
        if app.should_quit || lock_state(state).quit_requested {
            lock_state(state).quit_requested = true;
            return Ok(());
        }

        let now = Instant::now();
        app.push_toasts(config.toasts.drain(), now);
        app.expire_toasts(config.toast_ttl, now);

        terminal.draw(|frame| render(frame, state, app, config.messages))?;

        // Poll for input events (100ms timeout for responsive rendering).
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && let Some(command) = handle_key_event(key, app, state)
            && commands.send(command).is_err()
        {
            // Nobody is running commands any more.
            app.should_quit = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdesk::settings::{Notice, Notifier, Toast};
    use ratatui::backend::TestBackend;

    fn config() -> TuiConfig {
        TuiConfig::default()
    }

    #[test]
    fn tui_config_default() {
        let config = TuiConfig::default();
        assert_eq!(config.toast_ttl, Duration::from_secs(4));
        assert!(config.toasts.is_empty());
        assert_eq!(config.messages.save_label, "保存");
    }

    #[test]
    fn renders_placeholder_and_actions() {
        let state = Mutex::new(SettingsState::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        let mut app = App::new();
        let config = config();

        terminal
            .draw(|frame| render(frame, &state, &mut app, config.messages))
            .unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("Esc quit"));
        assert!(screen.contains("^S"));
        assert!(screen.contains("^R"));
    }

    #[test]
    fn renders_buffer_and_toast() {
        let state = Mutex::new(SettingsState {
            prompt: "You are a helpful assistant.".into(),
            ..Default::default()
        });
        let config = config();
        config.toasts.notify(Toast::error(Notice {
            title: "Save failed",
            description: "Please try again later",
        }));
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        let mut app = App::new();
        app.push_toasts(config.toasts.drain(), Instant::now());

        terminal
            .draw(|frame| render(frame, &state, &mut app, config.messages))
            .unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("You are a helpful assistant."));
        assert!(screen.contains("Save failed"));
    }
}
