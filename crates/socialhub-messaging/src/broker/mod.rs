//! Broker contract.
//!
//! A topic is a named log, ordered per key. Producers key by subject entity
//! id so every event for one entity is delivered to a consumer group in
//! publish order. Nothing is ordered across keys.

pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use socialhub_core::result::AppResult;

pub use memory::MemoryBroker;

/// A message delivered to a consumer group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
    pub partition: u32,
    pub offset: u64,
}

impl InboundMessage {
    /// Decode the payload document. Unknown fields are ignored.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        Ok(serde_json::from_slice(&self.payload)?)
    }

    /// Decode the payload as an untyped JSON value.
    pub fn json(&self) -> AppResult<serde_json::Value> {
        self.decode()
    }
}

/// Receiving side of one group membership on one topic.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    group: String,
    rx: mpsc::Receiver<InboundMessage>,
}

impl Subscription {
    pub fn new(topic: String, group: String, rx: mpsc::Receiver<InboundMessage>) -> Self {
        Self { topic, group, rx }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Next message, or `None` once the broker has dropped this member.
    pub async fn recv(&mut self) -> Option<InboundMessage> {
        self.rx.recv().await
    }
}

/// Opaque broker service.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Append a payload to `topic` under `key`.
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> AppResult<()>;

    /// Join consumer group `group` on `topic`. Members of one group share the
    /// topic's partitions; every group sees every message.
    async fn subscribe(&self, topic: &str, group: &str) -> AppResult<Subscription>;
}
