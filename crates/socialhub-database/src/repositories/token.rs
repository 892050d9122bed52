//! Token store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use socialhub_core::result::AppResult;
use socialhub_entity::token::Token;

/// Server-side token records, keyed by the SHA-256 hash of the raw value.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store a freshly issued token.
    async fn insert(&self, token: &Token) -> AppResult<()>;

    /// Look up a token by hash.
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<Token>>;

    /// Revoke one token. Returns `true` only for the call that flipped the flag.
    async fn revoke(&self, token_hash: &str) -> AppResult<bool>;

    /// Revoke every live token of a user. Returns the number revoked.
    async fn revoke_all_for_user(&self, user_id: i64) -> AppResult<u64>;

    /// Delete tokens whose expiry is before `now`. Returns the number deleted.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
