//! `notification-events` payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Notification category. Unknown categories survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationType {
    NewPost,
    NewComment,
    ReplyComment,
    FriendRequest,
    AcceptFriendship,
    LikePost,
    NewMessage,
    System,
    Other(String),
}

impl NotificationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NewPost => "NEW_POST",
            Self::NewComment => "NEW_COMMENT",
            Self::ReplyComment => "REPLY_COMMENT",
            Self::FriendRequest => "FRIEND_REQUEST",
            Self::AcceptFriendship => "ACCEPT_FRIENDSHIP",
            Self::LikePost => "LIKE_POST",
            Self::NewMessage => "NEW_MESSAGE",
            Self::System => "SYSTEM",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for NotificationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NEW_POST" => Self::NewPost,
            "NEW_COMMENT" => Self::NewComment,
            "REPLY_COMMENT" => Self::ReplyComment,
            "FRIEND_REQUEST" => Self::FriendRequest,
            "ACCEPT_FRIENDSHIP" => Self::AcceptFriendship,
            "LIKE_POST" => Self::LikePost,
            "NEW_MESSAGE" => Self::NewMessage,
            "SYSTEM" => Self::System,
            _ => Self::Other(value),
        }
    }
}

impl From<NotificationType> for String {
    fn from(value: NotificationType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direct notification request addressed to a single receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEventPayload {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(default)]
    pub message: String,
    pub sender_id: i64,
    pub receiver_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
}
