//! Background sweep configuration.

use serde::{Deserialize, Serialize};

/// Cron schedules for the periodic sweeps.
///
/// Expressions use the six-field form with seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler starts at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Expired token sweep schedule.
    #[serde(default = "default_token_cleanup_cron")]
    pub token_cleanup_cron: String,
    /// Expired OTP sweep schedule.
    #[serde(default = "default_otp_cleanup_cron")]
    pub otp_cleanup_cron: String,
    /// Notification retention sweep schedule.
    #[serde(default = "default_notification_cleanup_cron")]
    pub notification_cleanup_cron: String,
    /// Search deletion-marker sweep schedule.
    #[serde(default = "default_search_tombstone_cron")]
    pub search_tombstone_cron: String,
    /// How long a deleted search id keeps rejecting late creates and updates.
    #[serde(default = "default_search_tombstone_retention")]
    pub search_tombstone_retention_hours: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            token_cleanup_cron: default_token_cleanup_cron(),
            otp_cleanup_cron: default_otp_cleanup_cron(),
            notification_cleanup_cron: default_notification_cleanup_cron(),
            search_tombstone_cron: default_search_tombstone_cron(),
            search_tombstone_retention_hours: default_search_tombstone_retention(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_token_cleanup_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_otp_cleanup_cron() -> String {
    "0 */15 * * * *".to_string()
}

fn default_notification_cleanup_cron() -> String {
    "0 30 3 * * *".to_string()
}

fn default_search_tombstone_cron() -> String {
    "0 45 3 * * *".to_string()
}

fn default_search_tombstone_retention() -> i64 {
    168
}
