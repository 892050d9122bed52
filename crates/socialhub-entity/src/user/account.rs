//! Account entity owned by the auth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use socialhub_core::events::{UserEventPayload, UserEventType};

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Numeric account id shared with every downstream service.
    pub id: i64,
    /// Unique login email.
    pub email: String,
    /// Argon2 password hash. Absent for OAuth-only accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// Granted roles, propagated in `X-User-Roles`.
    pub roles: Vec<String>,
    /// OAuth provider registration id, if the account was federated.
    pub provider: Option<String>,
    /// Subject id at the OAuth provider.
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Wire document announcing this account's current state.
    pub fn to_event(&self, event_type: UserEventType) -> UserEventPayload {
        UserEventPayload {
            user_id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            created_at: self.created_at,
            updated_at: match event_type {
                UserEventType::UserCreated => None,
                UserEventType::UserUpdated => Some(self.updated_at),
            },
            event_type,
        }
    }
}

/// Data for an account that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub roles: Vec<String>,
    pub provider: Option<String>,
    pub provider_id: Option<String>,
}
