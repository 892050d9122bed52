//! In-memory OTP store.
//!
//! The pending slot per (email, type) is a single map entry, so supersede
//! and verify serialize on its shard lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use socialhub_core::result::AppResult;
use socialhub_entity::otp::{Otp, OtpStatus, OtpType};

use crate::repositories::OtpRepository;

type PendingKey = (String, OtpType);

#[derive(Debug, Default)]
pub struct MemoryOtpRepository {
    otps: DashMap<Uuid, Otp>,
    pending: DashMap<PendingKey, Uuid>,
}

impl MemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending codes for (email, type). Never more than one.
    pub fn pending_count(&self, email: &str, otp_type: OtpType) -> usize {
        self.otps
            .iter()
            .filter(|o| o.email == email && o.otp_type == otp_type && o.is_pending())
            .count()
    }
}

#[async_trait]
impl OtpRepository for MemoryOtpRepository {
    async fn replace_pending(&self, otp: &Otp) -> AppResult<u64> {
        let key = (otp.email.clone(), otp.otp_type);
        let mut slot = self.pending.entry(key).or_insert(otp.id);
        let mut superseded = 0;
        if *slot != otp.id {
            if let Some(mut previous) = self.otps.get_mut(&*slot) {
                if previous.status == OtpStatus::Pending {
                    previous.status = OtpStatus::Expired;
                    superseded += 1;
                }
            }
            *slot = otp.id;
        }
        self.otps.insert(otp.id, otp.clone());
        Ok(superseded)
    }

    async fn find_pending(&self, email: &str, otp_type: OtpType) -> AppResult<Option<Otp>> {
        let key = (email.to_string(), otp_type);
        let Some(id) = self.pending.get(&key).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self
            .otps
            .get(&id)
            .filter(|o| o.is_pending())
            .map(|o| o.clone()))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: OtpStatus,
        to: OtpStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let Some(mut otp) = self.otps.get_mut(&id) else {
            return Ok(false);
        };
        if otp.status != from {
            return Ok(false);
        }
        otp.status = to;
        if to == OtpStatus::Verified {
            otp.verified_at = Some(at);
        }
        let key = (otp.email.clone(), otp.otp_type);
        drop(otp);
        if from == OtpStatus::Pending {
            self.pending.remove_if(&key, |_, pending_id| *pending_id == id);
        }
        Ok(true)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut deleted = 0;
        self.otps.retain(|_, otp| {
            let keep = otp.expires_at >= now;
            if !keep {
                deleted += 1;
            }
            keep
        });
        self.pending.retain(|_, id| self.otps.contains_key(id));
        Ok(deleted)
    }
}
