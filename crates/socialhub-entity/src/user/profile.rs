//! Replicated user profile kept by downstream services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use socialhub_core::events::UserEventPayload;

/// A downstream copy of an account's public fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Timestamp compared on replicated updates.
    pub fn version(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<&UserEventPayload> for UserProfile {
    fn from(payload: &UserEventPayload) -> Self {
        Self {
            user_id: payload.user_id,
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            email: payload.email.clone(),
            phone_number: payload.phone_number.clone(),
            created_at: payload.created_at,
            updated_at: payload.version(),
        }
    }
}
