//! Token repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_entity::token::Token;

use crate::repositories::TokenRepository;

#[derive(Debug, Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn insert(&self, token: &Token) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tokens (id, token_hash, user_id, issued_at, expires_at, revoked, device_metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(token.id)
        .bind(&token.token_hash)
        .bind(token.user_id)
        .bind(token.issued_at)
        .bind(token.expires_at)
        .bind(token.revoked)
        .bind(&token.device_metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store token", e))?;
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<Token>> {
        sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find token", e))
    }

    async fn revoke(&self, token_hash: &str) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE tokens SET revoked = TRUE WHERE token_hash = $1 AND revoked = FALSE")
                .bind(token_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to revoke token", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to revoke user tokens", e)
                })?;
        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete expired tokens", e)
            })?;
        Ok(result.rows_affected())
    }
}
