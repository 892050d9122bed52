//! Response DTOs.

use serde::{Deserialize, Serialize};

use socialhub_entity::otp::OtpStatus;

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Outcome of an OTP check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifyResponse {
    pub status: OtpStatus,
}

/// Like state of a post after a like or unlike.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    /// Whether this call changed anything.
    pub changed: bool,
    pub like_count: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub online_sessions: usize,
}
