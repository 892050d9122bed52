//! Friendship store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use socialhub_core::result::AppResult;
use socialhub_entity::friendship::{Friendship, FriendshipStatus};

#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Record a pending request. Fails with a conflict if the pair already has one.
    async fn create_request(
        &self,
        requester_id: i64,
        addressee_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Friendship>;

    async fn find(&self, id: i64) -> AppResult<Option<Friendship>>;

    /// Move a friendship out of `Pending`. Returns `None` if it was not pending.
    async fn resolve(
        &self,
        id: i64,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Friendship>>;

    /// Ids of every accepted friend of `user_id`.
    async fn friend_ids(&self, user_id: i64) -> AppResult<Vec<i64>>;
}
