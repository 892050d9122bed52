//! OTP store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use socialhub_core::result::AppResult;
use socialhub_entity::otp::{Otp, OtpStatus, OtpType};

#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Store `otp` as the only pending code for its (email, type), expiring
    /// any earlier pending one. Returns how many were superseded.
    async fn replace_pending(&self, otp: &Otp) -> AppResult<u64>;

    /// The pending code for (email, type), if any.
    async fn find_pending(&self, email: &str, otp_type: OtpType) -> AppResult<Option<Otp>>;

    /// Move a code from `from` to `to`. Returns `false` if it was no longer in `from`.
    async fn transition(
        &self,
        id: Uuid,
        from: OtpStatus,
        to: OtpStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Delete codes whose expiry is before `now`. Returns the number deleted.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
