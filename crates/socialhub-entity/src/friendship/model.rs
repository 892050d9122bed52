//! Friendship entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a friendship request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
}

/// A friendship between two users, owned by the main service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub id: i64,
    /// The user who sent the request.
    pub requester_id: i64,
    /// The user who received the request.
    pub addressee_id: i64,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// Whether `user_id` is one of the two parties.
    pub fn involves(&self, user_id: i64) -> bool {
        self.requester_id == user_id || self.addressee_id == user_id
    }

    /// The party that is not `user_id`.
    pub fn other_party(&self, user_id: i64) -> Option<i64> {
        if self.requester_id == user_id {
            Some(self.addressee_id)
        } else if self.addressee_id == user_id {
            Some(self.requester_id)
        } else {
            None
        }
    }
}
