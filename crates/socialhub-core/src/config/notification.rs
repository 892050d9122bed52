//! Notification service configuration.

use serde::{Deserialize, Serialize};

/// Fan-out and retention settings for the notification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Base URL of the main service exposing the internal friend lookup.
    #[serde(default = "default_friend_service_url")]
    pub friend_service_url: String,
    /// Timeout for a friend lookup in milliseconds.
    #[serde(default = "default_friend_lookup_timeout")]
    pub friend_lookup_timeout_ms: u64,
    /// Notifications older than this many days are deleted by the retention sweep.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            friend_service_url: default_friend_service_url(),
            friend_lookup_timeout_ms: default_friend_lookup_timeout(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_friend_service_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_friend_lookup_timeout() -> u64 {
    3000
}

fn default_retention_days() -> i64 {
    90
}
