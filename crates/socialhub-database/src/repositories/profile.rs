//! Replicated profile store contract.

use async_trait::async_trait;

use socialhub_core::result::AppResult;
use socialhub_entity::user::UserProfile;

/// Downstream copy of user profiles, written only by the user-sync consumer.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert unless a profile for the user already exists. Returns `true` if inserted.
    async fn insert_if_absent(&self, profile: UserProfile) -> AppResult<bool>;

    /// Insert, or replace an existing profile whose version is not newer.
    /// Returns `true` if the store changed.
    async fn upsert_if_newer(&self, profile: UserProfile) -> AppResult<bool>;

    async fn find(&self, user_id: i64) -> AppResult<Option<UserProfile>>;

    async fn count(&self) -> AppResult<u64>;
}
