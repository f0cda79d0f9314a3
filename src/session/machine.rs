//! QR login state machine
//!
//! `LoginMachine` drives the individual upstream steps of the QR login
//! flow: requesting a login key, fetching the QR image, polling for the
//! scan and confirmation events, and exchanging the confirmed key for
//! session cookies. The background watcher sequences these steps; callers
//! observe progress through the shared [`LoginState`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, redirect};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::session::cookies::{collect_cookie_header, cookie_value};
use crate::session::fingerprint::generate_fp;
use crate::types::state::{LoginState, LoginStep};
use crate::types::wire::{RandkeyData, ScanPoll, ZpEnvelope};

const RANDKEY_PATH: &str = "/wapi/zppassport/captcha/randkey";
const QRCODE_PATH: &str = "/wapi/zpweixin/qrcode/getqrcode";
const SCAN_PATH: &str = "/wapi/zppassport/qrcode/scan";
const SCAN_LOGIN_PATH: &str = "/wapi/zppassport/qrcode/scanLogin";
const DISPATCHER_PATH: &str = "/wapi/zppassport/qrcode/dispatcher";

pub struct LoginMachine {
    settings: Arc<Settings>,
    http: Client,
    state: Arc<RwLock<LoginState>>,
    qr_image: RwLock<Option<Vec<u8>>>,
}

impl LoginMachine {
    /// Build the machine and its HTTP client.
    ///
    /// The client carries the portal's browser-like default headers and
    /// never follows redirects: the dispatcher responds with a redirect
    /// whose `Set-Cookie` headers would be lost if it were followed.
    pub fn new(settings: Arc<Settings>, state: Arc<RwLock<LoginState>>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.portal.user_agent)
                .map_err(|e| Error::config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&settings.portal.referer)
                .map_err(|e| Error::config(format!("invalid referer: {e}")))?,
        );
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(&settings.portal.origin)
                .map_err(|e| Error::config(format!("invalid origin: {e}")))?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(settings.login.poll_timeout_secs + 10))
            .build()?;

        Ok(Self {
            settings,
            http,
            state,
            qr_image: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.portal.base_url, path)
    }

    pub(crate) fn http_client(&self) -> Client {
        self.http.clone()
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn state_handle(&self) -> Arc<RwLock<LoginState>> {
        Arc::clone(&self.state)
    }

    /// Current state snapshot.
    pub async fn snapshot(&self) -> LoginState {
        self.state.read().await.clone()
    }

    /// Begin a fresh login attempt: obtain a login key, fetch the QR
    /// image and move to [`LoginStep::QrGenerated`].
    ///
    /// Returns the login key and the QR image URL.
    pub async fn start(&self) -> Result<(String, String)> {
        self.state.write().await.reset();
        *self.qr_image.write().await = None;

        let envelope: ZpEnvelope<RandkeyData> = self
            .http
            .post(self.url(RANDKEY_PATH))
            .send()
            .await?
            .json()
            .await?;
        let qr_id = envelope.into_data()?.qr_id;
        info!(qr_id = %qr_id, "obtained login key");

        let image_url = format!("{}?content={}", self.url(QRCODE_PATH), qr_id);
        let image = self.http.get(&image_url).send().await?.bytes().await?;
        debug!(bytes = image.len(), "fetched QR image");
        *self.qr_image.write().await = Some(image.to_vec());

        {
            let mut state = self.state.write().await;
            state.qr_id = Some(qr_id.clone());
            state.image_url = Some(image_url.clone());
            state.step = LoginStep::QrGenerated;
        }
        Ok((qr_id, image_url))
    }

    /// The most recently fetched QR image, if any.
    pub async fn qr_image(&self) -> Option<Vec<u8>> {
        self.qr_image.read().await.clone()
    }

    /// One long-poll round of the scan endpoint.
    ///
    /// Returns `true` once the QR code has been scanned (and records the
    /// transition to [`LoginStep::Scanned`]). A `"timeout"` answer is the
    /// normal idle outcome and yields `false`.
    pub async fn poll_scan_once(&self, qr_id: &str) -> Result<bool> {
        let response = self
            .http
            .get(self.url(SCAN_PATH))
            .query(&[("uuid", qr_id)])
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "scan poll returned non-success status");
            return Ok(false);
        }
        let poll: ScanPoll = response.json().await.unwrap_or_default();
        if poll.is_timeout() {
            return Ok(false);
        }
        if poll.scaned {
            self.state.write().await.step = LoginStep::Scanned;
            info!(qr_id = %qr_id, "QR code scanned");
            return Ok(true);
        }
        Ok(false)
    }

    /// One long-poll round of the confirmation endpoint.
    ///
    /// An HTTP 200 means the user confirmed the login on their phone;
    /// the machine moves to [`LoginStep::Confirmed`].
    pub async fn poll_confirm_once(&self, qr_id: &str) -> Result<bool> {
        let response = self
            .http
            .get(self.url(SCAN_LOGIN_PATH))
            .query(&[("qrId", qr_id), ("status", "1")])
            .send()
            .await?;
        if response.status().is_success() {
            self.state.write().await.step = LoginStep::Confirmed;
            info!(qr_id = %qr_id, "login confirmed");
            return Ok(true);
        }
        debug!(status = %response.status(), "confirmation still pending");
        Ok(false)
    }

    /// Exchange the confirmed login key for session cookies.
    ///
    /// Sends the device fingerprint to the dispatcher and harvests every
    /// `Set-Cookie` header from the (unfollowed) redirect response.
    /// Returns the joined cookie string and the `bst` session token when
    /// present.
    pub async fn exchange_cookies(&self, qr_id: &str) -> Result<(String, Option<String>)> {
        let fp = generate_fp(&self.settings.login.fp_plaintext, &self.settings.login.fp_key)?;
        let response = self
            .http
            .get(self.url(DISPATCHER_PATH))
            .query(&[("qrId", qr_id), ("pk", "header-login"), ("fp", fp.as_str())])
            .send()
            .await?;

        let cookie = collect_cookie_header(response.headers());
        if cookie.is_empty() {
            return Err(Error::cookie_exchange(
                "dispatcher response carried no Set-Cookie headers",
            ));
        }
        let session_token = cookie_value(&cookie, "bst").map(str::to_string);
        info!(
            has_token = session_token.is_some(),
            "exchanged login key for session cookies"
        );
        Ok((cookie, session_token))
    }
}
