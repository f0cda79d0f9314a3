//! Session manager
//!
//! Owns the login machine, the shared login state and the background
//! watcher task. At most one login attempt runs at a time: starting a new
//! attempt cancels the previous watcher before issuing a fresh QR code.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use zhipin_session_provider::config::Settings;
//! use zhipin_session_provider::SessionManager;
//!
//! # tokio_test::block_on(async {
//! let manager = SessionManager::new(Arc::new(Settings::default())).unwrap();
//!
//! let state = manager.login_status().await;
//! assert!(!state.is_logged_in);
//! # });
//! ```

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::Result;
use crate::jobs::JobsClient;
use crate::session::browser::{ChallengeBrowser, HeadlessChallenger};
use crate::session::machine::LoginMachine;
use crate::session::watcher;
use crate::types::jobs::{GreetingReceipt, JobFilters, JobListPage};
use crate::types::state::LoginState;

/// Session manager over a pluggable challenge browser.
pub struct SessionManagerGeneric<B: ChallengeBrowser> {
    machine: Arc<LoginMachine>,
    browser: Arc<B>,
    jobs: JobsClient,
    watcher: Mutex<Option<CancellationToken>>,
}

/// The default manager, backed by a headless Chromium challenger.
pub type SessionManager = SessionManagerGeneric<HeadlessChallenger>;

impl SessionManager {
    /// Create a manager with the default headless challenger.
    pub fn new(settings: Arc<Settings>) -> Result<Self> {
        let browser = Arc::new(HeadlessChallenger::new(Arc::clone(&settings)));
        Self::with_browser(settings, browser)
    }
}

impl<B: ChallengeBrowser + 'static> SessionManagerGeneric<B> {
    /// Create a manager with a custom challenge browser.
    pub fn with_browser(settings: Arc<Settings>, browser: Arc<B>) -> Result<Self> {
        let state = Arc::new(RwLock::new(LoginState::default()));
        let machine = Arc::new(LoginMachine::new(settings, Arc::clone(&state))?);
        let jobs = JobsClient::new(machine.http_client(), machine.state_handle());
        Ok(Self {
            machine,
            browser,
            jobs,
            watcher: Mutex::new(None),
        })
    }

    /// Start a fresh login attempt.
    ///
    /// Cancels any watcher still running for a previous attempt, issues a
    /// new QR code and spawns the background watcher that drives the rest
    /// of the flow. Returns the new [`LoginState`] snapshot.
    pub async fn start_login(&self) -> Result<LoginState> {
        if let Some(previous) = self.watcher.lock().await.take() {
            debug!("cancelling previous login watcher");
            previous.cancel();
        }

        let (qr_id, _image_url) = self.machine.start().await?;

        let cancel = CancellationToken::new();
        *self.watcher.lock().await = Some(cancel.clone());
        tokio::spawn(watcher::run(
            Arc::clone(&self.machine),
            Arc::clone(&self.browser),
            qr_id,
            cancel,
        ));
        info!("login watcher started");

        Ok(self.machine.snapshot().await)
    }

    /// Current login state snapshot.
    pub async fn login_status(&self) -> LoginState {
        self.machine.snapshot().await
    }

    /// Cancel the in-flight login attempt, if any.
    ///
    /// Returns `true` when a watcher was actually cancelled.
    pub async fn cancel_login(&self) -> bool {
        match self.watcher.lock().await.take() {
            Some(token) => {
                token.cancel();
                info!("login attempt cancelled");
                true
            }
            None => false,
        }
    }

    /// The current QR image (PNG bytes), if a login attempt has one.
    pub async fn qr_image(&self) -> Option<Vec<u8>> {
        self.machine.qr_image().await
    }

    /// Fetch recommended job listings. Requires a logged-in session.
    pub async fn list_jobs(&self, filters: &JobFilters) -> Result<JobListPage> {
        self.jobs
            .list_jobs(&self.machine.settings().portal.base_url, filters)
            .await
    }

    /// Send a greeting to the poster of a job. Requires a logged-in session.
    pub async fn send_greeting(
        &self,
        security_id: &str,
        job_id: &str,
    ) -> Result<GreetingReceipt> {
        self.jobs
            .send_greeting(&self.machine.settings().portal.base_url, security_id, job_id)
            .await
    }
}
