//! Upstream wire formats
//!
//! Raw shapes of the Boss Zhipin API responses before reshaping. The field
//! names (including the misspelled `scaned`) mirror the upstream JSON.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every JSON response from the portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZpEnvelope<T> {
    /// Upstream status code, 0 means success
    #[serde(default)]
    pub code: i64,
    /// Human-readable message accompanying non-zero codes
    #[serde(default)]
    pub message: Option<String>,
    /// Payload, absent on failures
    #[serde(rename = "zpData")]
    pub zp_data: Option<T>,
}

impl<T> ZpEnvelope<T> {
    /// Unwrap the payload, converting non-zero codes into a typed error
    pub fn into_data(self) -> crate::Result<T> {
        if self.code != 0 {
            return Err(crate::Error::upstream(
                self.code,
                self.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        self.zp_data
            .ok_or_else(|| crate::Error::internal("upstream envelope had no zpData"))
    }
}

/// Payload of the randkey (handshake) call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandkeyData {
    /// Handshake token naming this login attempt
    #[serde(rename = "qrId")]
    pub qr_id: String,
}

/// Body of a scan-poll response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanPoll {
    /// Set once the mobile client has scanned the QR image (upstream spelling)
    #[serde(default)]
    pub scaned: bool,
    /// "timeout" when the long poll expired without a scan
    #[serde(default)]
    pub msg: Option<String>,
}

impl ScanPoll {
    /// Whether this response is the long-poll timeout marker
    pub fn is_timeout(&self) -> bool {
        self.msg.as_deref() == Some("timeout")
    }
}

/// Raw job record as returned by the recommend listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobWire {
    pub security_id: Option<String>,
    pub encrypt_boss_id: Option<String>,
    pub encrypt_job_id: Option<String>,
    pub job_degree: Option<String>,
    pub job_name: Option<String>,
    pub lid: Option<String>,
    pub salary_desc: Option<String>,
    #[serde(default)]
    pub job_labels: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub job_experience: Option<String>,
    pub city_name: Option<String>,
    pub area_district: Option<String>,
    pub encrypt_brand_id: Option<String>,
    pub brand_name: Option<String>,
    pub brand_scale_name: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    pub contact: bool,
    #[serde(default)]
    pub show_top_position: bool,
}

impl From<JobWire> for crate::types::JobListing {
    fn from(wire: JobWire) -> Self {
        Self {
            security_id: wire.security_id,
            encrypt_boss_id: wire.encrypt_boss_id,
            encrypt_job_id: wire.encrypt_job_id,
            job_degree: wire.job_degree,
            job_name: wire.job_name,
            lid: wire.lid,
            salary_desc: wire.salary_desc,
            job_labels: wire.job_labels,
            skills: wire.skills,
            job_experience: wire.job_experience,
            city_name: wire.city_name,
            area_district: wire.area_district,
            encrypt_brand_id: wire.encrypt_brand_id,
            brand_name: wire.brand_name,
            brand_scale_name: wire.brand_scale_name,
            industry: wire.industry,
            contact: wire.contact,
            show_top_position: wire.show_top_position,
        }
    }
}

/// Payload of the recommend listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobListData {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub job_list: Vec<JobWire>,
}

/// Payload of the greeting (friend-add) endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GreetingData {
    #[serde(default)]
    pub show_greeting: bool,
    pub security_id: Option<String>,
    pub boss_source: Option<i64>,
    pub source: Option<i64>,
    pub enc_boss_id: Option<String>,
}

impl From<GreetingData> for crate::types::GreetingReceipt {
    fn from(wire: GreetingData) -> Self {
        Self {
            show_greeting: wire.show_greeting,
            security_id: wire.security_id,
            boss_source: wire.boss_source,
            source: wire.source,
            enc_boss_id: wire.enc_boss_id,
        }
    }
}
