//! In-memory notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use socialhub_core::result::AppResult;
use socialhub_core::types::{PageRequest, PageResponse};
use socialhub_entity::notification::{NewNotification, Notification};

use crate::repositories::NotificationRepository;

type DedupKey = (String, i64, i64, i64);

#[derive(Debug, Default)]
pub struct MemoryNotificationRepository {
    notifications: DashMap<Uuid, Notification>,
    dedup: DashMap<DedupKey, Uuid>,
}

impl MemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored notification addressed to `receiver_id`, newest first.
    fn inbox(&self, receiver_id: i64) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|n| n.receiver_id == receiver_id)
            .map(|n| n.clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items
    }

    fn forget_dedup(&self, notification: &Notification) {
        if let Some(reference) = notification.reference_id {
            let key = (
                notification.notification_type.clone(),
                notification.sender_id,
                notification.receiver_id,
                reference,
            );
            self.dedup.remove_if(&key, |_, id| *id == notification.id);
        }
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(&self, new: NewNotification) -> AppResult<Option<Notification>> {
        let key = new.dedup_key();
        let notification = new.into_notification(Utc::now());
        match key {
            Some(key) => match self.dedup.entry(key) {
                Entry::Occupied(_) => return Ok(None),
                Entry::Vacant(slot) => {
                    slot.insert(notification.id);
                    self.notifications
                        .insert(notification.id, notification.clone());
                }
            },
            None => {
                self.notifications
                    .insert(notification.id, notification.clone());
            }
        }
        Ok(Some(notification))
    }

    async fn find_for_receiver(
        &self,
        id: Uuid,
        receiver_id: i64,
    ) -> AppResult<Option<Notification>> {
        Ok(self
            .notifications
            .get(&id)
            .filter(|n| n.receiver_id == receiver_id)
            .map(|n| n.clone()))
    }

    async fn list_for_receiver(
        &self,
        receiver_id: i64,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        Ok(PageResponse::from_vec(self.inbox(receiver_id), page))
    }

    async fn count_unread(&self, receiver_id: i64) -> AppResult<u64> {
        Ok(self
            .notifications
            .iter()
            .filter(|n| n.receiver_id == receiver_id && !n.is_read)
            .count() as u64)
    }

    async fn set_read(
        &self,
        id: Uuid,
        receiver_id: i64,
        read: bool,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        match self.notifications.get_mut(&id) {
            Some(mut n) if n.receiver_id == receiver_id => {
                n.is_read = read;
                n.read_at = read.then_some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, receiver_id: i64, at: DateTime<Utc>) -> AppResult<u64> {
        let mut changed = 0;
        for mut n in self.notifications.iter_mut() {
            if n.receiver_id == receiver_id && !n.is_read {
                n.is_read = true;
                n.read_at = Some(at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(&self, id: Uuid, receiver_id: i64) -> AppResult<bool> {
        match self
            .notifications
            .remove_if(&id, |_, n| n.receiver_id == receiver_id)
        {
            Some((_, removed)) => {
                self.forget_dedup(&removed);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = Vec::new();
        self.notifications.retain(|_, n| {
            let keep = n.created_at >= cutoff;
            if !keep {
                removed.push(n.clone());
            }
            keep
        });
        for n in &removed {
            self.forget_dedup(n);
        }
        Ok(removed.len() as u64)
    }
}
