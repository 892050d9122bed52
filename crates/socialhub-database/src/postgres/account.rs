//! Account repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_entity::user::{NewAccount, UserAccount};

use crate::repositories::AccountRepository;

#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, new: NewAccount, now: DateTime<Utc>) -> AppResult<UserAccount> {
        sqlx::query_as::<_, UserAccount>(
            "INSERT INTO user_accounts \
             (email, password_hash, first_name, last_name, phone_number, roles, provider, provider_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING *",
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone_number)
        .bind(&new.roles)
        .bind(&new.provider)
        .bind(&new.provider_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                AppError::with_source(
                    ErrorKind::Conflict,
                    format!("Email '{}' is already registered", new.email),
                    e,
                )
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create account", e)
            }
        })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>("SELECT * FROM user_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find account", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>(
            "SELECT * FROM user_accounts WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
        })
    }

    async fn update_profile(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        phone_number: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<UserAccount> {
        sqlx::query_as::<_, UserAccount>(
            "UPDATE user_accounts SET first_name = $2, last_name = $3, phone_number = $4, updated_at = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(phone_number)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update account", e))?
        .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }

    async fn update_password(
        &self,
        id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE user_accounts SET password_hash = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {id} not found")));
        }
        Ok(())
    }
}
