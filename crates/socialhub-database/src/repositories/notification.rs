//! Notification store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use socialhub_core::result::AppResult;
use socialhub_core::types::{PageRequest, PageResponse};
use socialhub_entity::notification::{NewNotification, Notification};

/// Notification persistence. Every owner-facing mutation is conditional on
/// `receiver_id` so one user can never touch another's inbox.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification. Returns `None` when a notification with the same
    /// (type, sender, receiver, reference) already exists.
    async fn insert(&self, new: NewNotification) -> AppResult<Option<Notification>>;

    /// Find one notification owned by `receiver_id`.
    async fn find_for_receiver(&self, id: Uuid, receiver_id: i64)
    -> AppResult<Option<Notification>>;

    /// Newest-first page of a receiver's notifications.
    async fn list_for_receiver(
        &self,
        receiver_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Number of unread notifications.
    async fn count_unread(&self, receiver_id: i64) -> AppResult<u64>;

    /// Set the read flag. Returns `false` if the notification is not owned by `receiver_id`.
    async fn set_read(
        &self,
        id: Uuid,
        receiver_id: i64,
        read: bool,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Mark every unread notification read. Returns the number changed.
    async fn mark_all_read(&self, receiver_id: i64, at: DateTime<Utc>) -> AppResult<u64>;

    /// Delete one notification. Returns `false` if it is not owned by `receiver_id`.
    async fn delete(&self, id: Uuid, receiver_id: i64) -> AppResult<bool>;

    /// Delete notifications created before `cutoff`. Returns the number deleted.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}
