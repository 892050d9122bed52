//! In-memory account store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_entity::user::{NewAccount, UserAccount};

use crate::repositories::AccountRepository;

#[derive(Debug)]
pub struct MemoryAccountRepository {
    accounts: DashMap<i64, UserAccount>,
    by_email: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            by_email: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, new: NewAccount, now: DateTime<Utc>) -> AppResult<UserAccount> {
        let email_key = new.email.to_lowercase();
        let Entry::Vacant(slot) = self.by_email.entry(email_key) else {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                new.email
            )));
        };
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let account = UserAccount {
            id,
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            roles: new.roles,
            provider: new.provider,
            provider_id: new.provider_id,
            created_at: now,
            updated_at: now,
        };
        self.accounts.insert(id, account.clone());
        slot.insert(id);
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<UserAccount>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let Some(id) = self.by_email.get(&email.to_lowercase()).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        phone_number: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<UserAccount> {
        let mut account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))?;
        account.first_name = first_name.to_string();
        account.last_name = last_name.to_string();
        account.phone_number = phone_number.map(str::to_string);
        account.updated_at = now;
        Ok(account.clone())
    }

    async fn update_password(
        &self,
        id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))?;
        account.password_hash = Some(password_hash.to_string());
        account.updated_at = now;
        Ok(())
    }
}
