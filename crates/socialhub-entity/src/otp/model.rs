//! One-time password entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What a one-time password authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "otp_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpType {
    EmailVerification,
    PasswordReset,
    Login,
}

impl OtpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailVerification => "EMAIL_VERIFICATION",
            Self::PasswordReset => "PASSWORD_RESET",
            Self::Login => "LOGIN",
        }
    }
}

impl fmt::Display for OtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpType {
    type Err = socialhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EMAIL_VERIFICATION" => Ok(Self::EmailVerification),
            "PASSWORD_RESET" => Ok(Self::PasswordReset),
            "LOGIN" => Ok(Self::Login),
            _ => Err(socialhub_core::AppError::validation(format!(
                "Invalid OTP type: '{s}'"
            ))),
        }
    }
}

/// Verification state of a one-time password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "otp_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpStatus {
    Pending,
    Verified,
    Expired,
    Invalid,
}

/// A one-time password sent to an email address.
///
/// At most one `Pending` row exists per (email, type).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Otp {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub code: String,
    pub otp_type: OtpType,
    pub status: OtpStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl Otp {
    /// Whether the code is past its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the code can still be verified.
    pub fn is_pending(&self) -> bool {
        self.status == OtpStatus::Pending
    }
}
