//! Interactive terminal settings page for the custom assistant prompt.
//!
//! ```sh
//! promptdesk-tui --session "$TOKEN"
//! promptdesk-tui --session "$TOKEN" --locale en --log-file promptdesk.log
//! ```
//!
//! Keys: type to edit, `Ctrl+S` save, `Ctrl+R` reset to default,
//! `Ctrl+L` reload, `Esc` / `Ctrl+C` quit.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Mutex};

use clap::Parser;
use promptdesk::settings::{Locale, SettingsPage, ToastBuffer};
use promptdesk::{DEFAULT_PROXY_URL, ProxyClient};
use promptdesk_tui::{PageCommand, TuiConfig, spawn_tui};
use tracing_subscriber::EnvFilter;

/// Edit your custom assistant prompt in the terminal.
#[derive(Parser)]
#[command(name = "promptdesk-tui")]
struct Args {
    /// Base URL of the promptdesk-web proxy
    #[arg(long, env = "PROMPTDESK_PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    proxy_url: String,

    /// Session token sent to the proxy
    #[arg(long, env = "PROMPTDESK_SESSION", hide_env_values = true)]
    session: Option<String>,

    /// Language for the page copy (zh, en)
    #[arg(long, default_value_t = Locale::Zh)]
    locale: Locale,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        match File::create(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("promptdesk=debug,info")),
                    )
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .init();
            }
            Err(e) => {
                eprintln!("Error: cannot open log file {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    let client = match ProxyClient::new(&args.proxy_url, args.session.clone()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error: failed to create HTTP client: {e}");
            process::exit(1);
        }
    };

    let toasts = ToastBuffer::new();
    let page =
        SettingsPage::new(client.clone(), Arc::new(toasts.clone())).with_locale(args.locale);

    match client.current_user().await {
        Ok(user) => page.sign_in(user),
        Err(e) => {
            eprintln!("Error: could not reach proxy at {}: {e}", args.proxy_url);
            process::exit(1);
        }
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let handle = spawn_tui(
        page.state().clone(),
        tx,
        TuiConfig::new(toasts, page.messages()),
    );

    // Initial load, same as opening the page.
    tokio::spawn({
        let page = page.clone();
        async move {
            page.load().await;
        }
    });

    // Each command runs on its own task so a second click while one is in
    // flight reaches the controller and is refused there.
    while let Some(command) = rx.recv().await {
        tracing::debug!(?command, "page command");
        let page = page.clone();
        tokio::spawn(async move {
            match command {
                PageCommand::Save => {
                    page.save().await;
                }
                PageCommand::Reset => {
                    page.reset().await;
                }
                PageCommand::Reload => {
                    page.load().await;
                }
            }
        });
    }

    if handle.join().is_err() {
        eprintln!("Error: TUI thread panicked");
        process::exit(1);
    }
}
