//! Error type definitions
//!
//! Defines the main error types used throughout the session provider application.
//!
//! There are two tiers of failure in this crate: transport failures during
//! the scan/confirm polling loops are swallowed by the watcher and retried,
//! never surfaced through these types; everything else becomes a typed
//! [`Error`] carried back to the caller.

use thiserror::Error;

/// Main error type for the session provider
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Login flow errors (missing qr id, not logged in, ...)
    #[error("Login error: {0}")]
    Login(String),

    /// Non-zero status code returned by the upstream API
    #[error("Upstream error (code {code}): {message}")]
    Upstream { code: i64, message: String },

    /// Cookie exchange produced no usable cookies
    #[error("Cookie exchange failed: {0}")]
    CookieExchange(String),

    /// Device fingerprint generation errors
    #[error("Fingerprint error: {0}")]
    Fingerprint(String),

    /// Security-check (browser challenge) errors
    #[error("Security check failed at {stage}: {detail}")]
    SecurityCheck { stage: String, detail: String },

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new server error
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Create a new login error
    pub fn login(msg: impl Into<String>) -> Self {
        Self::Login(msg.into())
    }

    /// Create an upstream error from a status code and message
    pub fn upstream(code: i64, message: impl Into<String>) -> Self {
        Self::Upstream {
            code,
            message: message.into(),
        }
    }

    /// Create a cookie exchange error
    pub fn cookie_exchange(msg: impl Into<String>) -> Self {
        Self::CookieExchange(msg.into())
    }

    /// Create a fingerprint error
    pub fn fingerprint(msg: impl Into<String>) -> Self {
        Self::Fingerprint(msg.into())
    }

    /// Create a security-check error
    pub fn security_check(stage: impl Into<String>, detail: impl ToString) -> Self {
        Self::SecurityCheck {
            stage: stage.into(),
            detail: detail.to_string(),
        }
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
