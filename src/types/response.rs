//! HTTP response type definitions
//!
//! Shapes returned by the server endpoints.

use serde::{Deserialize, Serialize};

use crate::types::LoginStep;

/// Response of the start-login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStartResponse {
    /// Handshake token for this login attempt
    pub qr_id: String,
    /// Where the QR image can be fetched
    pub image_url: String,
    /// Step after a successful start, always `qr_generated`
    pub step: LoginStep,
}

impl LoginStartResponse {
    /// Create a new start-login response
    pub fn new(qr_id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            qr_id: qr_id.into(),
            image_url: image_url.into(),
            step: LoginStep::QrGenerated,
        }
    }
}

/// Request body of the greeting endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreetingRequest {
    /// Security token taken from a job listing
    pub security_id: String,
    /// Encrypted job id taken from a job listing
    pub job_id: String,
}

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(server_uptime: u64, version: impl Into<String>) -> Self {
        Self {
            server_uptime,
            version: version.into(),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
