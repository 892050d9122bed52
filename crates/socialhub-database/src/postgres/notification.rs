//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_core::types::{PageRequest, PageResponse};
use socialhub_entity::notification::{NewNotification, Notification};

use crate::repositories::NotificationRepository;

#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, new: NewNotification) -> AppResult<Option<Notification>> {
        let n = new.into_notification(Utc::now());
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (id, notification_type, message, sender_id, receiver_id, is_read, read_at, created_at, reference_id, reference_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (notification_type, sender_id, receiver_id, reference_id) \
             WHERE reference_id IS NOT NULL DO NOTHING \
             RETURNING *",
        )
        .bind(n.id)
        .bind(&n.notification_type)
        .bind(&n.message)
        .bind(n.sender_id)
        .bind(n.receiver_id)
        .bind(n.is_read)
        .bind(n.read_at)
        .bind(n.created_at)
        .bind(n.reference_id)
        .bind(&n.reference_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn find_for_receiver(
        &self,
        id: Uuid,
        receiver_id: i64,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND receiver_id = $2",
        )
        .bind(id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notification", e))
    }

    async fn list_for_receiver(
        &self,
        receiver_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let page = page.normalized();
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE receiver_id = $1")
                .bind(receiver_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
                })?;

        let items = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE receiver_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(receiver_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))?;

        Ok(PageResponse::new(items, &page, total as u64))
    }

    async fn count_unread(&self, receiver_id: i64) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;
        Ok(count as u64)
    }

    async fn set_read(
        &self,
        id: Uuid,
        receiver_id: i64,
        read: bool,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = $3, read_at = $4 WHERE id = $1 AND receiver_id = $2",
        )
        .bind(id)
        .bind(receiver_id)
        .bind(read)
        .bind(read.then_some(at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update notification", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, receiver_id: i64, at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $2 \
             WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(receiver_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid, receiver_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND receiver_id = $2")
            .bind(id)
            .bind(receiver_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge notifications", e)
            })?;
        Ok(result.rows_affected())
    }
}
