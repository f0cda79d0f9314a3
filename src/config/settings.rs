//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the session provider.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default fingerprint plaintext observed on the login page.
///
/// This is a short-lived, site-specific constant reverse-engineered from the
/// target site; it may expire without notice and should be overridden through
/// configuration when it does.
pub const DEFAULT_FP_PLAINTEXT: &str = "8048b8676fb7d3d8952276e6e98e0bde.f2dc7a63c4b0fbfa4b51a07e2710cf83.fef7e750fc3a1e6327e8a880915aee9c.ae00f848beb1aa591d71d5a80dd3bd95";

/// Default base64 AES key paired with [`DEFAULT_FP_PLAINTEXT`].
pub const DEFAULT_FP_KEY: &str = "clRwXUJBK1VKK0k0IWFbbQ==";

/// Default security-check challenge URL, captured from a live login session.
pub const DEFAULT_CHALLENGE_URL: &str = "https://www.zhipin.com/web/common/security-check.html?seed=ttttZij2JIIK%2BxUw73%2B6ZmzsaYKTbDQuIH6OR6Bm54o%3D&name=e331459e&ts=1762256958405&callbackUrl=https%3A%2F%2Fwww.zhipin.com%2Fweb%2Fgeek%2Fjobs";

/// Main configuration settings for the session provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server configuration
    pub server: ServerSettings,
    /// Target portal configuration
    pub portal: PortalSettings,
    /// Login flow configuration
    pub login: LoginSettings,
    /// Headless browser (security check) configuration
    pub browser: BrowserSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Target portal (Boss Zhipin) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Base URL of the site, without trailing slash
    pub base_url: String,
    /// Referer sent with every request
    pub referer: String,
    /// Origin sent with every request
    pub origin: String,
    /// Browser user agent presented to the site
    pub user_agent: String,
}

/// Login state machine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSettings {
    /// Delay between consecutive scan/confirm polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Backoff after a transport failure during polling, in milliseconds
    pub poll_backoff_ms: u64,
    /// Per-request timeout for the long-poll endpoints, in seconds
    pub poll_timeout_secs: u64,
    /// Fingerprint plaintext fed into the AES encryption
    pub fp_plaintext: String,
    /// Base64-encoded 16-byte AES key for the fingerprint
    pub fp_key: String,
}

/// Security-check browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Whether the security-check pass runs at all
    pub enabled: bool,
    /// Explicit browser executable; discovered automatically when unset
    pub executable: Option<String>,
    /// Challenge page visited after cookie exchange
    pub challenge_url: String,
    /// Cookie domain the exchanged cookies are injected under
    pub cookie_domain: String,
    /// Upper bound on waiting for network idle, in milliseconds
    pub idle_timeout_ms: u64,
    /// Consecutive quiet window that counts as "idle", in milliseconds
    pub idle_quiet_ms: u64,
    /// Extra settle delay after network idle, in milliseconds
    pub settle_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "::".to_string(),
            port: 4417,
            timeout_secs: 30,
        }
    }
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.zhipin.com".to_string(),
            referer: "https://www.zhipin.com/web/user/?ka=header-login".to_string(),
            origin: "https://www.zhipin.com".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            poll_backoff_ms: 2000,
            poll_timeout_secs: 35,
            fp_plaintext: DEFAULT_FP_PLAINTEXT.to_string(),
            fp_key: DEFAULT_FP_KEY.to_string(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            executable: None,
            challenge_url: DEFAULT_CHALLENGE_URL.to_string(),
            cookie_domain: ".zhipin.com".to_string(),
            idle_timeout_ms: 30_000,
            idle_quiet_ms: 1_500,
            settle_ms: 3_000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            portal: PortalSettings::default(),
            login: LoginSettings::default(),
            browser: BrowserSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML configuration file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Overlay environment variables onto the current settings
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(host) = std::env::var("ZP_SERVER_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("ZP_SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid port: {}", e)))?;
        }

        if let Ok(base_url) = std::env::var("ZP_PORTAL_URL") {
            self.portal.base_url = base_url;
        }

        if let Ok(plaintext) = std::env::var("ZP_FP_PLAINTEXT") {
            self.login.fp_plaintext = plaintext;
        }

        if let Ok(key) = std::env::var("ZP_FP_KEY") {
            self.login.fp_key = key;
        }

        if let Ok(browser_check) = std::env::var("ZP_BROWSER_CHECK") {
            self.browser.enabled = browser_check
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid ZP_BROWSER_CHECK: {}", e)))?;
        }

        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.portal.base_url.is_empty() {
            return Err(crate::Error::config("portal.base_url must not be empty"));
        }

        url::Url::parse(&self.portal.base_url)
            .map_err(|e| crate::Error::Config(format!("Invalid portal.base_url: {}", e)))?;

        use base64::Engine;
        let key = base64::engine::general_purpose::STANDARD
            .decode(&self.login.fp_key)
            .map_err(|e| crate::Error::Config(format!("login.fp_key is not valid base64: {}", e)))?;
        if key.len() != 16 {
            return Err(crate::Error::config(format!(
                "login.fp_key must decode to 16 bytes, got {}",
                key.len()
            )));
        }

        if self.login.poll_interval_ms == 0 {
            return Err(crate::Error::config("login.poll_interval_ms must be > 0"));
        }

        Ok(())
    }
}
