//! HTTP server binary for the job-board session provider
//!
//! Starts an HTTP server that drives the QR login flow and exposes the
//! authenticated job-board operations. This is the recommended mode for
//! long-running deployments.
//!
//! # Usage
//!
//! ```bash
//! zhipin-session-server --port 4417 --host ::
//! ```
//!
//! # API Endpoints
//!
//! - `POST /login/start`: Begin a QR login attempt
//! - `GET /login/status`: Current login state
//! - `GET /login/qrcode`: The QR image to scan
//! - `POST /login/cancel`: Cancel the in-flight attempt
//! - `GET /jobs`: Recommended job listings
//! - `POST /greet`: Greet a job's poster
//! - `GET /ping`: Health check endpoint

use std::path::PathBuf;

use clap::Parser;
use zhipin_session_provider::cli::{ServerArgs, run_server_mode};

/// HTTP server for the job-board session provider
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "4417")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "::")]
    host: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    run_server_mode(ServerArgs {
        port: cli.port,
        host: cli.host,
        config: cli.config,
        verbose: cli.verbose,
    })
    .await
}
