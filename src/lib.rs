//! Boss Zhipin Session Provider - Rust Implementation
//!
//! Automates the unofficial QR-code login flow of the Boss Zhipin job board
//! and performs authenticated actions (recommended-job listing, greetings)
//! with the resulting session cookie.
//!
//! # Architecture
//!
//! The project consists of two main operation modes:
//! - **HTTP Server Mode**: An always-running REST API service exposing the
//!   login state machine and job-board actions
//! - **Script Mode**: A command-line tool that drives one login attempt to
//!   completion and prints the final cookie
//!
//! # Usage
//!
//! ## HTTP Server Mode
//!
//! ```bash
//! zhipin-session-server --port 4417 --host 0.0.0.0
//! ```
//!
//! ## Script Mode
//!
//! ```bash
//! zhipin-session-login --qr-output ./qrcode.png
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use zhipin_session_provider::{SessionManager, Settings};
//!
//! # fn example() -> zhipin_session_provider::Result<()> {
//! let settings = Arc::new(Settings::default());
//! let session_manager = SessionManager::new(settings)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod server;
pub mod session;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use jobs::JobsClient;
pub use session::SessionManager;
pub use types::{ErrorResponse, JobFilters, LoginState, LoginStep, PingResponse};
