//! JWT claims structure used in access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id, as a string.
    pub sub: String,
    /// Account email.
    pub email: String,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token id; matches the server-side token record.
    pub jti: Uuid,
}

impl Claims {
    /// Account id parsed from the subject claim.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
