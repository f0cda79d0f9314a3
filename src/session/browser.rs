//! Headless-browser security check
//!
//! After the cookie exchange the portal sometimes demands a JavaScript
//! proof-of-work before the session becomes fully usable. The
//! [`HeadlessChallenger`] drives a real Chromium through CDP: it injects
//! the freshly exchanged cookies, navigates to the security-check page,
//! waits for the challenge script to settle and reads back the upgraded
//! `document.cookie`.
//!
//! The [`ChallengeBrowser`] trait is the seam for tests; the login
//! watcher treats any challenger failure as non-fatal and keeps the
//! pre-challenge cookies.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, SetCookiesParams};
use chromiumoxide::Page;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};

/// Runs the portal's browser security check against a fresh session.
#[async_trait]
pub trait ChallengeBrowser: Send + Sync {
    /// Resolve the challenge starting from `initial_cookie` and return the
    /// (possibly upgraded) cookie string.
    async fn resolve(&self, initial_cookie: &str) -> Result<String>;
}

/// Find a usable Chromium-family executable.
///
/// Checks the `CHROME_EXECUTABLE` env var, then PATH, then well-known
/// install locations.
pub fn find_chrome_executable() -> Option<String> {
    if let Ok(p) = std::env::var("CHROME_EXECUTABLE") {
        if Path::new(&p).exists() {
            return Some(p);
        }
    }

    if let Ok(path_var) = std::env::var("PATH") {
        let candidates = ["google-chrome", "chromium", "chromium-browser", "chrome"];
        for dir in std::env::split_paths(&path_var) {
            for exe in candidates {
                let full = dir.join(exe);
                if full.exists() {
                    return Some(full.to_string_lossy().to_string());
                }
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        let candidates = [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        let candidates = [
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    None
}

/// `ChallengeBrowser` backed by a throwaway headless Chromium instance.
pub struct HeadlessChallenger {
    settings: Arc<Settings>,
}

impl HeadlessChallenger {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let exe = self
            .settings
            .browser
            .executable
            .clone()
            .or_else(find_chrome_executable)
            .ok_or_else(|| Error::security_check("launch", "no Chromium executable found"))?;

        BrowserConfig::builder()
            .chrome_executable(exe)
            .window_size(1280, 800)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", self.settings.portal.user_agent))
            .build()
            .map_err(|e| Error::security_check("launch", e))
    }

    fn cookie_params(&self, initial_cookie: &str) -> Result<Vec<CookieParam>> {
        let domain = &self.settings.browser.cookie_domain;
        let mut params = Vec::new();
        for pair in initial_cookie.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let param = CookieParam::builder()
                .name(name)
                .value(value)
                .domain(domain.as_str())
                .path("/")
                .build()
                .map_err(|e| Error::security_check("inject", e))?;
            params.push(param);
        }
        if params.is_empty() {
            return Err(Error::security_check("inject", "no cookies to inject"));
        }
        Ok(params)
    }

    /// Wait until the page has stopped loading new resources.
    async fn wait_until_idle(&self, page: &Page) {
        let quiet = Duration::from_millis(self.settings.browser.idle_quiet_ms);
        let deadline = Instant::now() + Duration::from_millis(self.settings.browser.idle_timeout_ms);
        let mut last_count: i64 = -1;
        let mut quiet_since = Instant::now();

        while Instant::now() < deadline {
            let count = page
                .evaluate("performance.getEntriesByType('resource').length")
                .await
                .ok()
                .and_then(|v| v.into_value::<i64>().ok())
                .unwrap_or(-1);
            if count != last_count {
                last_count = count;
                quiet_since = Instant::now();
            } else if quiet_since.elapsed() >= quiet {
                debug!(resources = count, "challenge page went idle");
                return;
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        warn!("challenge page never went idle; continuing anyway");
    }
}

#[async_trait]
impl ChallengeBrowser for HeadlessChallenger {
    async fn resolve(&self, initial_cookie: &str) -> Result<String> {
        let config = self.browser_config()?;
        let cookies = self.cookie_params(initial_cookie)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::security_check("launch", e))?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = async {
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| Error::security_check("page", e))?;

            page.execute(SetCookiesParams::new(cookies))
                .await
                .map_err(|e| Error::security_check("inject", e))?;

            info!(url = %self.settings.browser.challenge_url, "navigating to security check");
            page.goto(self.settings.browser.challenge_url.as_str())
                .await
                .map_err(|e| Error::security_check("navigate", e))?;

            self.wait_until_idle(&page).await;
            tokio::time::sleep(Duration::from_millis(self.settings.browser.settle_ms)).await;

            let cookie: String = page
                .evaluate("document.cookie")
                .await
                .map_err(|e| Error::security_check("harvest", e))?
                .into_value()
                .map_err(|e| Error::security_check("harvest", e))?;

            if cookie.trim().is_empty() {
                return Err(Error::security_check("harvest", "document.cookie came back empty"));
            }
            Ok(cookie)
        }
        .await;

        let _ = browser.close().await;
        handler_task.abort();
        outcome
    }
}
