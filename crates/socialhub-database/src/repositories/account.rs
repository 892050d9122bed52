//! Account store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use socialhub_core::result::AppResult;
use socialhub_entity::user::{NewAccount, UserAccount};

/// Accounts owned by the auth service. Emails are unique, case-insensitively.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create an account. Fails with a conflict if the email is taken.
    async fn create(&self, new: NewAccount, now: DateTime<Utc>) -> AppResult<UserAccount>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<UserAccount>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;

    /// Replace the public profile fields.
    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        phone_number: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<UserAccount>;

    /// Replace the password hash.
    async fn update_password(&self, id: i64, password_hash: &str, now: DateTime<Utc>)
    -> AppResult<()>;
}
