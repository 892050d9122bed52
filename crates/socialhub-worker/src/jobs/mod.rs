//! Sweep job implementations.

pub mod notification;
pub mod otp;
pub mod search;
pub mod token;

use async_trait::async_trait;

use socialhub_core::result::AppResult;

pub use notification::NotificationRetentionJob;
pub use otp::OtpSweepJob;
pub use search::SearchTombstoneJob;
pub use token::TokenSweepJob;

/// A periodic cleanup task.
#[async_trait]
pub trait SweepJob: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Six-field cron expression (seconds first).
    fn schedule(&self) -> &str;

    /// Run one sweep. Returns the number of rows removed.
    async fn run_once(&self) -> AppResult<u64>;
}
