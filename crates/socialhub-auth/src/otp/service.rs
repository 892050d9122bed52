//! OTP send, verify and sweep.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use socialhub_core::config::AuthConfig;
use socialhub_core::result::AppResult;
use socialhub_database::repositories::OtpRepository;
use socialhub_entity::otp::{Otp, OtpStatus, OtpType};

/// Issues and checks one-time codes. At most one code per (email, type) is
/// pending at a time; sending a new one expires the previous one.
#[derive(Clone)]
pub struct OtpService {
    otps: Arc<dyn OtpRepository>,
    ttl: Duration,
    length: u32,
}

impl std::fmt::Debug for OtpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpService")
            .field("ttl", &self.ttl)
            .field("length", &self.length)
            .finish()
    }
}

impl OtpService {
    pub fn new(otps: Arc<dyn OtpRepository>, config: &AuthConfig) -> Self {
        Self {
            otps,
            ttl: Duration::minutes(config.otp_ttl_minutes),
            length: config.otp_length.max(1),
        }
    }

    fn generate_code(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }

    /// Issue a fresh code, superseding any pending one.
    pub async fn send(&self, email: &str, otp_type: OtpType) -> AppResult<Otp> {
        let now = Utc::now();
        let otp = Otp {
            id: Uuid::new_v4(),
            email: normalize(email),
            code: self.generate_code(),
            otp_type,
            status: OtpStatus::Pending,
            created_at: now,
            expires_at: now + self.ttl,
            verified_at: None,
        };
        let superseded = self.otps.replace_pending(&otp).await?;
        info!(email = %otp.email, otp_type = %otp_type, superseded, "OTP issued");
        Ok(otp)
    }

    /// Check a submitted code.
    ///
    /// - `Verified`: matched the pending, unexpired code, which is consumed.
    /// - `Expired`: the pending code is past its expiry and is now retired.
    /// - `Invalid`: no pending code, or a mismatch. A mismatch keeps the
    ///   pending code usable.
    pub async fn verify(&self, email: &str, otp_type: OtpType, code: &str) -> AppResult<OtpStatus> {
        self.verify_at(email, otp_type, code, Utc::now()).await
    }

    pub(crate) async fn verify_at(
        &self,
        email: &str,
        otp_type: OtpType,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<OtpStatus> {
        let email = normalize(email);
        let Some(pending) = self.otps.find_pending(&email, otp_type).await? else {
            debug!(email = %email, otp_type = %otp_type, "No pending OTP");
            return Ok(OtpStatus::Invalid);
        };

        if pending.is_expired_at(now) {
            self.otps
                .transition(pending.id, OtpStatus::Pending, OtpStatus::Expired, now)
                .await?;
            return Ok(OtpStatus::Expired);
        }

        if pending.code != code.trim() {
            return Ok(OtpStatus::Invalid);
        }

        // A concurrent verify or supersede may have moved it first.
        if self
            .otps
            .transition(pending.id, OtpStatus::Pending, OtpStatus::Verified, now)
            .await?
        {
            info!(email = %email, otp_type = %otp_type, "OTP verified");
            Ok(OtpStatus::Verified)
        } else {
            Ok(OtpStatus::Invalid)
        }
    }

    /// Delete codes past their expiry.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        self.otps.delete_expired(Utc::now()).await
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
