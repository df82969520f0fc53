//! Read, save, or reset your custom assistant prompt through a running
//! `promptdesk-web` proxy.
//!
//! Drives the same settings page controller the TUI uses, so the
//! notifications printed here are the ones the page would show.
//!
//! # Examples
//!
//! ```sh
//! # Show the current prompt
//! promptdesk --session "$TOKEN" get
//!
//! # Save a new prompt
//! promptdesk --session "$TOKEN" save --text "You are a helpful assistant."
//!
//! # Save from a file
//! promptdesk --session "$TOKEN" save --stdin < prompt.txt
//!
//! # Go back to the system default
//! promptdesk --session "$TOKEN" --locale en reset
//! ```

use std::io::{self, Read};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use promptdesk::settings::{ActionOutcome, Locale, SettingsPage, Toast, ToastBuffer};
use promptdesk::{DEFAULT_PROXY_URL, ProxyClient};
use tracing_subscriber::EnvFilter;

/// Manage your custom assistant prompt.
#[derive(Parser)]
#[command(name = "promptdesk")]
struct Cli {
    /// Base URL of the promptdesk-web proxy
    #[arg(long, env = "PROMPTDESK_PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    proxy_url: String,

    /// Session token sent to the proxy
    #[arg(long, env = "PROMPTDESK_SESSION", hide_env_values = true)]
    session: Option<String>,

    /// Language for notifications (zh, en)
    #[arg(long, default_value_t = Locale::Zh)]
    locale: Locale,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current prompt (empty means the system default)
    Get,
    /// Replace the prompt
    Save {
        /// New prompt text
        #[arg(long, conflicts_with = "stdin")]
        text: Option<String>,
        /// Read the new prompt from stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Drop the custom prompt and use the system default
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let client = match ProxyClient::new(&cli.proxy_url, cli.session.clone()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error: failed to create HTTP client: {e}");
            process::exit(1);
        }
    };

    let toasts = ToastBuffer::new();
    let page = SettingsPage::new(client.clone(), Arc::new(toasts.clone())).with_locale(cli.locale);

    // Resolve who we are; an unknown session simply leaves the page logged out.
    match client.current_user().await {
        Ok(user) => page.sign_in(user),
        Err(e) => {
            eprintln!("Error: could not reach proxy at {}: {e}", cli.proxy_url);
            process::exit(1);
        }
    }

    let outcome = match cli.command {
        Command::Get => {
            let outcome = page.load().await;
            if outcome == ActionOutcome::Skipped {
                // Mirror the save/reset precondition so `get` explains itself.
                eprintln!("{}", page.messages().not_logged_in.title);
            } else if outcome.is_success() {
                println!("{}", page.prompt());
            }
            outcome
        }
        Command::Save { text, stdin } => {
            let prompt = match (text, stdin) {
                (Some(t), _) => t,
                (None, true) => {
                    let mut buf = String::new();
                    if let Err(e) = io::stdin().read_to_string(&mut buf) {
                        eprintln!("Error: failed to read stdin: {e}");
                        process::exit(1);
                    }
                    buf
                }
                (None, false) => {
                    eprintln!("Error: provide --text or --stdin");
                    process::exit(2);
                }
            };
            page.set_prompt(prompt);
            page.save().await
        }
        Command::Reset => {
            let outcome = page.reset().await;
            if outcome.is_success() {
                println!("{}", page.prompt());
            }
            outcome
        }
    };

    for toast in toasts.drain() {
        print_toast(&toast);
    }

    if !outcome.is_success() {
        process::exit(1);
    }
}

fn print_toast(toast: &Toast) {
    let marker = if toast.is_error() { "✗" } else { "✓" };
    eprintln!(
        "[{}] {marker} {} — {}",
        toast.time, toast.title, toast.description
    );
}
