//! Script mode binary for a one-shot QR login
//!
//! Runs the full QR login flow in the foreground: writes the QR image to
//! disk, waits for the phone-side scan and confirmation, performs the
//! cookie exchange (and browser security check) and prints the resulting
//! session as JSON to stdout. Logs go to stderr so the output stays
//! machine-readable.
//!
//! # Usage
//!
//! ```bash
//! zhipin-session-login --qr-output qrcode.png
//! ```
//!
//! # Output
//!
//! ```json
//! {
//!   "cookie": "wt2=...; bst=...",
//!   "sessionToken": "...",
//!   "step": "logged_in"
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zhipin_session_provider::config::ConfigLoader;
use zhipin_session_provider::session::{HeadlessChallenger, LoginMachine, watcher};
use zhipin_session_provider::types::LoginState;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "zhipin-session-login")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the QR image
    #[arg(short, long, default_value = "qrcode.png")]
    qr_output: PathBuf,

    /// Skip the headless-browser security check
    #[arg(long)]
    no_browser: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging goes to stderr; stdout carries the JSON result.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let loader = ConfigLoader::new();
    let mut settings = loader.load(cli.config.as_deref())?;
    if cli.no_browser {
        settings.browser.enabled = false;
    }
    settings.validate()?;
    let settings = Arc::new(settings);

    let state = Arc::new(RwLock::new(LoginState::default()));
    let machine = Arc::new(LoginMachine::new(
        Arc::clone(&settings),
        Arc::clone(&state),
    )?);
    let browser = Arc::new(HeadlessChallenger::new(Arc::clone(&settings)));

    let (qr_id, _image_url) = machine.start().await?;
    if let Some(png) = machine.qr_image().await {
        tokio::fs::write(&cli.qr_output, png).await?;
        info!("QR code written to {}", cli.qr_output.display());
    }
    eprintln!("Scan the QR code in {} with the mobile app...", cli.qr_output.display());

    // Run the watcher in the foreground; Ctrl-C cancels.
    let cancel = CancellationToken::new();
    let watcher_cancel = cancel.clone();
    tokio::select! {
        _ = watcher::run(Arc::clone(&machine), browser, qr_id, watcher_cancel) => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted; cancelling login");
            cancel.cancel();
        }
    }

    let snapshot = machine.snapshot().await;
    if snapshot.is_logged_in {
        let output = serde_json::json!({
            "cookie": snapshot.cookie,
            "sessionToken": snapshot.session_token,
            "step": snapshot.step,
        });
        println!("{}", serde_json::to_string(&output)?);
        info!("login complete");
        Ok(())
    } else {
        if let Some(message) = &snapshot.error_message {
            eprintln!("Login failed: {message}");
        } else {
            eprintln!("Login did not complete");
        }
        println!("{{}}");
        std::process::exit(1);
    }
}
