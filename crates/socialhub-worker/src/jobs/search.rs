//! Search deletion-marker sweep.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::debug;

use socialhub_core::result::AppResult;
use socialhub_database::Stores;

use super::SweepJob;

/// Drops deletion markers from the post, comment and user indexes once
/// they are older than the retention window.
///
/// A create or update redelivered after its id's marker is dropped indexes
/// the document again, so the window must exceed the broker's redelivery
/// horizon.
#[derive(Clone)]
pub struct SearchTombstoneJob {
    stores: Stores,
    retention: Duration,
    schedule: String,
}

impl std::fmt::Debug for SearchTombstoneJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTombstoneJob")
            .field("retention", &self.retention)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

impl SearchTombstoneJob {
    pub fn new(stores: Stores, retention_hours: i64, schedule: impl Into<String>) -> Self {
        Self {
            stores,
            retention: Duration::hours(retention_hours),
            schedule: schedule.into(),
        }
    }
}

#[async_trait]
impl SweepJob for SearchTombstoneJob {
    fn name(&self) -> &'static str {
        "search_tombstone_cleanup"
    }

    fn schedule(&self) -> &str {
        &self.schedule
    }

    async fn run_once(&self) -> AppResult<u64> {
        let before = Utc::now() - self.retention;
        let posts = self.stores.post_index.purge_deleted(before).await?;
        let comments = self.stores.comment_index.purge_deleted(before).await?;
        let users = self.stores.user_index.purge_deleted(before).await?;
        debug!(posts, comments, users, "Search deletion markers dropped");
        Ok(posts + comments + users)
    }
}
