//! Notification retention sweep.

use async_trait::async_trait;

use socialhub_consumer::NotificationService;
use socialhub_core::result::AppResult;

use super::SweepJob;

#[derive(Debug, Clone)]
pub struct NotificationRetentionJob {
    notifications: NotificationService,
    schedule: String,
}

impl NotificationRetentionJob {
    pub fn new(notifications: NotificationService, schedule: impl Into<String>) -> Self {
        Self {
            notifications,
            schedule: schedule.into(),
        }
    }
}

#[async_trait]
impl SweepJob for NotificationRetentionJob {
    fn name(&self) -> &'static str {
        "notification_cleanup"
    }

    fn schedule(&self) -> &str {
        &self.schedule
    }

    async fn run_once(&self) -> AppResult<u64> {
        self.notifications.purge_expired().await
    }
}
