//! Session management for the QR login flow
//!
//! This module owns the login state machine, the device-fingerprint
//! generator, cookie handling, the background polling watcher and the
//! headless-browser security-check pass.

pub mod browser;
pub mod cookies;
pub mod fingerprint;
pub mod machine;
pub mod manager;
pub mod watcher;

pub use browser::{ChallengeBrowser, HeadlessChallenger};
pub use cookies::{collect_cookie_header, cookie_value, parse_set_cookie};
pub use fingerprint::generate_fp;
pub use machine::LoginMachine;
pub use manager::{SessionManager, SessionManagerGeneric};
