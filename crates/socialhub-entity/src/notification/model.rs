//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use socialhub_core::events::{NotificationEventPayload, NotificationType};

/// A notification delivered to a single receiver.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Notification category (`NEW_POST`, `ACCEPT_FRIENDSHIP`, ...).
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Rendered message text.
    pub message: String,
    /// The user whose action triggered the notification.
    pub sender_id: i64,
    /// The owner of the notification.
    pub receiver_id: i64,
    /// Whether the owner has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Identifier of the entity the notification refers to.
    pub reference_id: Option<i64>,
    /// Kind of entity `reference_id` points at.
    pub reference_type: Option<String>,
}

impl Notification {
    /// Parsed notification category.
    pub fn kind(&self) -> NotificationType {
        NotificationType::from(self.notification_type.clone())
    }
}

/// Data for a notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub message: String,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub reference_id: Option<i64>,
    pub reference_type: Option<String>,
}

impl NewNotification {
    /// Deduplication key. Only referenced notifications are deduplicated.
    pub fn dedup_key(&self) -> Option<(String, i64, i64, i64)> {
        self.reference_id.map(|reference| {
            (
                self.notification_type.to_string(),
                self.sender_id,
                self.receiver_id,
                reference,
            )
        })
    }

    /// Materialize a stored row with a fresh time-ordered id.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::now_v7(),
            notification_type: self.notification_type.to_string(),
            message: self.message,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            is_read: false,
            read_at: None,
            created_at: now,
            reference_id: self.reference_id,
            reference_type: self.reference_type,
        }
    }
}

impl From<NotificationEventPayload> for NewNotification {
    fn from(payload: NotificationEventPayload) -> Self {
        Self {
            notification_type: payload.notification_type,
            message: payload.message,
            sender_id: payload.sender_id,
            receiver_id: payload.receiver_id,
            reference_id: payload.reference_id,
            reference_type: payload.reference_type,
        }
    }
}
