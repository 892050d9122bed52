//! Message broker configuration.

use serde::{Deserialize, Serialize};

/// In-process broker and consumer loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Number of partitions per topic. Keys hash onto partitions.
    #[serde(default = "default_partitions")]
    pub partitions: u32,
    /// Bounded buffer per subscriber and for the publisher queue.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Prefix used to derive consumer group names (`{prefix}-{service}`).
    #[serde(default = "default_group_prefix")]
    pub group_prefix: String,
}

impl BrokerConfig {
    /// Consumer group name for a downstream service.
    pub fn group_for(&self, service: &str) -> String {
        format!("{}-{service}", self.group_prefix)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            channel_capacity: default_channel_capacity(),
            group_prefix: default_group_prefix(),
        }
    }
}

fn default_partitions() -> u32 {
    4
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_group_prefix() -> String {
    "socialhub".to_string()
}
