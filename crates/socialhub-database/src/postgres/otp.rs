//! OTP repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_entity::otp::{Otp, OtpStatus, OtpType};

use crate::repositories::OtpRepository;

#[derive(Debug, Clone)]
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    async fn replace_pending(&self, otp: &Otp) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin OTP transaction"))?;

        let superseded = sqlx::query(
            "UPDATE otps SET status = 'EXPIRED' \
             WHERE email = $1 AND otp_type = $2 AND status = 'PENDING'",
        )
        .bind(&otp.email)
        .bind(otp.otp_type)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to supersede pending OTP"))?
        .rows_affected();

        sqlx::query(
            "INSERT INTO otps (id, email, code, otp_type, status, created_at, expires_at, verified_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(otp.id)
        .bind(&otp.email)
        .bind(&otp.code)
        .bind(otp.otp_type)
        .bind(otp.status)
        .bind(otp.created_at)
        .bind(otp.expires_at)
        .bind(otp.verified_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to store OTP"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit OTP transaction"))?;
        Ok(superseded)
    }

    async fn find_pending(&self, email: &str, otp_type: OtpType) -> AppResult<Option<Otp>> {
        sqlx::query_as::<_, Otp>(
            "SELECT * FROM otps WHERE email = $1 AND otp_type = $2 AND status = 'PENDING'",
        )
        .bind(email)
        .bind(otp_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find pending OTP"))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: OtpStatus,
        to: OtpStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let verified_at = (to == OtpStatus::Verified).then_some(at);
        let result = sqlx::query(
            "UPDATE otps SET status = $3, verified_at = COALESCE($4, verified_at) \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(verified_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update OTP status"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM otps WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete expired OTPs"))?;
        Ok(result.rows_affected())
    }
}
