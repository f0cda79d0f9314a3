//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

/// Test helper functions
pub mod helpers {
    use std::sync::Arc;
    use zhipin_session_provider::config::Settings;

    /// Settings pointing at a mock portal, tuned for fast test polling.
    pub fn mock_portal_settings(base_url: &str) -> Arc<Settings> {
        let mut settings = Settings::default();
        settings.portal.base_url = base_url.to_string();
        settings.login.poll_interval_ms = 10;
        settings.login.poll_backoff_ms = 10;
        settings.login.poll_timeout_secs = 5;
        settings.browser.enabled = false;
        Arc::new(settings)
    }

    /// Wait until `predicate` holds or the timeout elapses.
    pub async fn wait_for<F, Fut>(timeout_ms: u64, mut predicate: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let deadline = std::time::Instant::now() + std::time::Duration::from_millis(timeout_ms);
        while std::time::Instant::now() < deadline {
            if predicate().await {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        false
    }
}
