//! Login state definitions
//!
//! The session keeps one authoritative [`LoginState`] record per process.
//! The background watcher is the only writer while a login attempt runs;
//! everyone else reads snapshots of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of the QR login flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoginStep {
    /// No login attempt in progress
    #[default]
    Idle,
    /// Handshake token acquired and QR image available
    QrGenerated,
    /// The mobile client has scanned the QR image
    Scanned,
    /// The user approved the login on their device
    Confirmed,
    /// Headless browser is completing the anti-bot challenge
    SecurityCheck,
    /// Terminal state, session cookie is usable
    LoggedIn,
}

impl std::fmt::Display for LoginStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoginStep::Idle => "idle",
            LoginStep::QrGenerated => "qr_generated",
            LoginStep::Scanned => "scanned",
            LoginStep::Confirmed => "confirmed",
            LoginStep::SecurityCheck => "security_check",
            LoginStep::LoggedIn => "logged_in",
        };
        f.write_str(s)
    }
}

/// Snapshot of the login state machine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoginState {
    /// Whether a usable session cookie exists
    pub is_logged_in: bool,
    /// Canonical `name=value; name=value` cookie string
    pub cookie: Option<String>,
    /// The `bst` value, sent as the `zp_token` header on API calls
    pub session_token: Option<String>,
    /// Handshake token naming the current login attempt
    pub qr_id: Option<String>,
    /// Current phase of the flow
    pub step: LoginStep,
    /// URL of the QR image for this attempt
    pub image_url: Option<String>,
    /// Last application-level failure, if any
    pub error_message: Option<String>,
    /// When the session became usable
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl LoginState {
    /// Reset to defaults for a fresh login attempt
    pub fn reset(&mut self) {
        *self = LoginState::default();
    }

    /// Record the terminal logged-in state
    pub fn mark_logged_in(&mut self, cookie: impl Into<String>, session_token: Option<String>) {
        self.is_logged_in = true;
        self.cookie = Some(cookie.into());
        self.session_token = session_token;
        self.step = LoginStep::LoggedIn;
        self.error_message = None;
        self.logged_in_at = Some(Utc::now());
    }

    /// Record an application-level failure without changing the step
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = LoginState::default();
        assert!(!state.is_logged_in);
        assert_eq!(state.step, LoginStep::Idle);
        assert_eq!(state.cookie, None);
    }

    #[test]
    fn test_step_serialization() {
        let json = serde_json::to_string(&LoginStep::QrGenerated).unwrap();
        assert_eq!(json, "\"qr_generated\"");

        let step: LoginStep = serde_json::from_str("\"security_check\"").unwrap();
        assert_eq!(step, LoginStep::SecurityCheck);
    }

    #[test]
    fn test_mark_logged_in() {
        let mut state = LoginState::default();
        state.record_error("transient");
        state.mark_logged_in("wt2=abc; bst=xyz", Some("xyz".to_string()));

        assert!(state.is_logged_in);
        assert_eq!(state.step, LoginStep::LoggedIn);
        assert_eq!(state.cookie.as_deref(), Some("wt2=abc; bst=xyz"));
        assert_eq!(state.session_token.as_deref(), Some("xyz"));
        assert_eq!(state.error_message, None);
        assert!(state.logged_in_at.is_some());
    }

    #[test]
    fn test_reset() {
        let mut state = LoginState::default();
        state.qr_id = Some("Q1".to_string());
        state.step = LoginStep::Scanned;
        state.reset();

        assert_eq!(state.step, LoginStep::Idle);
        assert_eq!(state.qr_id, None);
    }

    #[test]
    fn test_state_snapshot_serialization() {
        let mut state = LoginState::default();
        state.qr_id = Some("Q1".to_string());
        state.step = LoginStep::QrGenerated;

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"qr_generated\""));

        let back: LoginState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.qr_id.as_deref(), Some("Q1"));
    }
}
