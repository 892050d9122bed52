//! Notification inbox operations for the owning user.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use socialhub_core::config::NotificationConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::types::{PageRequest, PageResponse};
use socialhub_database::repositories::NotificationRepository;
use socialhub_entity::notification::Notification;

/// Manages a user's notifications. Every call is scoped to `user_id`;
/// touching someone else's notification reads as not found.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    retention: Duration,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("retention", &self.retention)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>, config: &NotificationConfig) -> Self {
        Self {
            notifications,
            retention: Duration::days(config.retention_days),
        }
    }

    /// Newest-first page of the user's notifications.
    pub async fn list(&self, user_id: i64, page: PageRequest) -> AppResult<PageResponse<Notification>> {
        self.notifications
            .list_for_receiver(user_id, &page.normalized())
            .await
    }

    pub async fn unread_count(&self, user_id: i64) -> AppResult<u64> {
        self.notifications.count_unread(user_id).await
    }

    pub async fn get(&self, user_id: i64, id: Uuid) -> AppResult<Notification> {
        self.notifications
            .find_for_receiver(id, user_id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn mark_read(&self, user_id: i64, id: Uuid) -> AppResult<()> {
        self.set_read(user_id, id, true).await
    }

    pub async fn mark_unread(&self, user_id: i64, id: Uuid) -> AppResult<()> {
        self.set_read(user_id, id, false).await
    }

    /// Returns the number of notifications that changed.
    pub async fn mark_all_read(&self, user_id: i64) -> AppResult<u64> {
        let changed = self.notifications.mark_all_read(user_id, Utc::now()).await?;
        info!(user_id, changed, "Marked all notifications read");
        Ok(changed)
    }

    pub async fn delete(&self, user_id: i64, id: Uuid) -> AppResult<()> {
        if self.notifications.delete(id, user_id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Delete notifications older than the retention window.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - self.retention;
        self.notifications.delete_older_than(cutoff).await
    }

    async fn set_read(&self, user_id: i64, id: Uuid, read: bool) -> AppResult<()> {
        if self
            .notifications
            .set_read(id, user_id, read, Utc::now())
            .await?
        {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Notification {id} not found"))
}
