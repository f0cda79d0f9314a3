//! Background login watcher
//!
//! Runs the full QR login sequence after the QR code has been issued:
//! poll for the scan, poll for the confirmation, exchange cookies, run
//! the browser security check and finally mark the session as logged in.
//!
//! Transport errors during the polling phases are retried with a backoff
//! rather than failing the attempt; the phone-side user may simply be
//! slow. Cancellation (a new login attempt, or an explicit cancel) aborts
//! the watcher at every blocking step via its [`CancellationToken`]; a
//! cancelled attempt never writes its cookies into the shared state.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::session::browser::ChallengeBrowser;
use crate::session::cookies::cookie_value;
use crate::session::machine::LoginMachine;
use crate::types::state::LoginStep;

/// Sleep for `duration` unless the token fires first.
///
/// Returns `false` when the watcher was cancelled.
async fn sleep_or_cancel(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Repeat `poll` until it reports success, backing off on transport
/// errors. Returns `false` on cancellation.
async fn poll_until<F, Fut>(
    cancel: &CancellationToken,
    interval: Duration,
    backoff: Duration,
    what: &str,
    mut poll: F,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::Result<bool>>,
{
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let delay = match poll().await {
            Ok(true) => return true,
            Ok(false) => interval,
            Err(e) => {
                warn!(error = %e, "{what} poll failed; retrying");
                backoff
            }
        };
        if !sleep_or_cancel(cancel, delay).await {
            return false;
        }
    }
}

/// Drive one login attempt to completion (or cancellation).
pub async fn run<B: ChallengeBrowser>(
    machine: Arc<LoginMachine>,
    browser: Arc<B>,
    qr_id: String,
    cancel: CancellationToken,
) {
    let settings = machine.settings();
    let interval = Duration::from_millis(settings.login.poll_interval_ms);
    let backoff = Duration::from_millis(settings.login.poll_backoff_ms);
    let browser_enabled = settings.browser.enabled;
    let state = machine.state_handle();

    if !poll_until(&cancel, interval, backoff, "scan", || {
        machine.poll_scan_once(&qr_id)
    })
    .await
    {
        info!(qr_id = %qr_id, "login watcher cancelled while waiting for scan");
        return;
    }

    if !poll_until(&cancel, interval, backoff, "confirmation", || {
        machine.poll_confirm_once(&qr_id)
    })
    .await
    {
        info!(qr_id = %qr_id, "login watcher cancelled while waiting for confirmation");
        return;
    }

    let exchanged = tokio::select! {
        _ = cancel.cancelled() => {
            info!(qr_id = %qr_id, "login watcher cancelled before cookie exchange");
            return;
        }
        result = machine.exchange_cookies(&qr_id) => result,
    };
    let (cookie, session_token) = match exchanged {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, "cookie exchange failed");
            state.write().await.record_error(e.to_string());
            return;
        }
    };

    let (final_cookie, final_token) = if browser_enabled {
        if cancel.is_cancelled() {
            info!(qr_id = %qr_id, "login watcher cancelled before security check");
            return;
        }
        state.write().await.step = LoginStep::SecurityCheck;
        let resolved = tokio::select! {
            _ = cancel.cancelled() => {
                info!(qr_id = %qr_id, "login watcher cancelled during security check");
                return;
            }
            result = browser.resolve(&cookie) => result,
        };
        match resolved {
            Ok(upgraded) => {
                info!("security check passed");
                let token = cookie_value(&upgraded, "bst")
                    .map(str::to_string)
                    .or(session_token);
                (upgraded, token)
            }
            Err(e) => {
                // Non-fatal: the exchanged cookies are often usable as-is.
                warn!(error = %e, "security check failed; keeping exchanged cookies");
                (cookie, session_token)
            }
        }
    } else {
        (cookie, session_token)
    };

    // A new attempt may have reset the shared state while the exchange or
    // the security check was in flight. Never let a stale attempt publish
    // its cookies.
    if cancel.is_cancelled() {
        info!(qr_id = %qr_id, "login watcher cancelled; discarding completed attempt");
        return;
    }
    state.write().await.mark_logged_in(final_cookie, final_token);
    info!(qr_id = %qr_id, "login complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_poll_until_retries_then_succeeds() {
        let calls = AtomicUsize::new(0);
        let cancel = CancellationToken::new();
        let done = poll_until(
            &cancel,
            Duration::from_millis(1),
            Duration::from_millis(1),
            "test",
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    match n {
                        0 => Ok(false),
                        1 => Err(crate::Error::internal("flaky")),
                        _ => Ok(true),
                    }
                }
            },
        )
        .await;
        assert!(done);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_until_stops_on_cancel() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let done = poll_until(
            &cancel,
            Duration::from_millis(1),
            Duration::from_millis(1),
            "test",
            || async { Ok(false) },
        )
        .await;
        assert!(!done);
    }
}
