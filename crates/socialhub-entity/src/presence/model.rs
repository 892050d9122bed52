//! Presence record value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One connected chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    /// Transport session identifier.
    pub session_id: String,
    /// The user behind the session.
    pub user_id: i64,
    /// When the session connected.
    pub connected_at: DateTime<Utc>,
}
