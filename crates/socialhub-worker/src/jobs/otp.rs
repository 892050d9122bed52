//! Expired OTP sweep.

use async_trait::async_trait;

use socialhub_auth::OtpService;
use socialhub_core::result::AppResult;

use super::SweepJob;

#[derive(Debug, Clone)]
pub struct OtpSweepJob {
    otps: OtpService,
    schedule: String,
}

impl OtpSweepJob {
    pub fn new(otps: OtpService, schedule: impl Into<String>) -> Self {
        Self {
            otps,
            schedule: schedule.into(),
        }
    }
}

#[async_trait]
impl SweepJob for OtpSweepJob {
    fn name(&self) -> &'static str {
        "otp_cleanup"
    }

    fn schedule(&self) -> &str {
        &self.schedule
    }

    async fn run_once(&self) -> AppResult<u64> {
        self.otps.sweep_expired().await
    }
}
