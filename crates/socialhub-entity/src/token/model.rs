//! Access token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of an issued token.
///
/// `Revoked` is permanent. `Expired` is derived from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenState {
    Issued,
    Revoked,
    Expired,
}

/// A server-side record of an issued access token.
///
/// The raw token value is never stored; lookups go through its SHA-256 hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Token {
    /// Unique token identifier (also the `jti` claim).
    pub id: Uuid,
    /// SHA-256 hash of the raw token value.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// The account that owns this token.
    pub user_id: i64,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been revoked.
    pub revoked: bool,
    /// Client information captured at issue time (JSON).
    pub device_metadata: Option<serde_json::Value>,
}

impl Token {
    /// State at the given instant. Revocation wins over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked {
            TokenState::Revoked
        } else if now > self.expires_at {
            TokenState::Expired
        } else {
            TokenState::Issued
        }
    }

    /// Current state.
    pub fn state(&self) -> TokenState {
        self.state_at(Utc::now())
    }

    /// Whether the token is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
