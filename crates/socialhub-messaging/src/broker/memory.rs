//! In-process partitioned broker for single-node deployments and tests.

use std::collections::{HashMap, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use socialhub_core::config::BrokerConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;

use super::{InboundMessage, MessageBroker, Subscription};

/// Messages kept per topic for inspection.
const RETAINED_PER_TOPIC: usize = 10_000;

#[derive(Debug)]
struct TopicLog {
    next_offset: Vec<u64>,
    groups: HashMap<String, Vec<mpsc::Sender<InboundMessage>>>,
    retained: VecDeque<InboundMessage>,
}

impl TopicLog {
    fn new(partitions: u32) -> Self {
        Self {
            next_offset: vec![0; partitions as usize],
            groups: HashMap::new(),
            retained: VecDeque::new(),
        }
    }
}

/// Consumers join from the latest offset. A partition is always served by
/// the same group member while membership is stable, which keeps per-key
/// delivery in publish order.
#[derive(Debug)]
pub struct MemoryBroker {
    partitions: u32,
    capacity: usize,
    topics: Mutex<HashMap<String, TopicLog>>,
    available: AtomicBool,
}

impl MemoryBroker {
    pub fn new(partitions: u32, capacity: usize) -> Self {
        Self {
            partitions: partitions.max(1),
            capacity: capacity.max(1),
            topics: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn from_config(config: &BrokerConfig) -> Self {
        Self::new(config.partitions, config.channel_capacity)
    }

    /// Toggle availability. While unavailable every publish fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Messages retained for `topic`, oldest first.
    pub async fn messages(&self, topic: &str) -> Vec<InboundMessage> {
        let topics = self.topics.lock().await;
        topics
            .get(topic)
            .map(|log| log.retained.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn partition_for(&self, key: &str) -> u32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % u64::from(self.partitions)) as u32
    }
}

#[async_trait]
impl MessageBroker for MemoryBroker {
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>) -> AppResult<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AppError::broker(format!(
                "Broker unavailable, cannot publish to '{topic}'"
            )));
        }

        let partition = self.partition_for(key);
        let mut topics = self.topics.lock().await;
        let log = topics
            .entry(topic.to_string())
            .or_insert_with(|| TopicLog::new(self.partitions));

        let offset = log.next_offset[partition as usize];
        log.next_offset[partition as usize] += 1;

        let message = InboundMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload,
            partition,
            offset,
        };

        for (group, members) in log.groups.iter_mut() {
            members.retain(|tx| !tx.is_closed());
            if members.is_empty() {
                continue;
            }
            let member = partition as usize % members.len();
            if members[member].send(message.clone()).await.is_err() {
                warn!(topic, group = %group, "Consumer went away before delivery");
            }
        }

        log.retained.push_back(message);
        if log.retained.len() > RETAINED_PER_TOPIC {
            log.retained.pop_front();
        }

        debug!(topic, key, partition, offset, "Message published");
        Ok(())
    }

    async fn subscribe(&self, topic: &str, group: &str) -> AppResult<Subscription> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut topics = self.topics.lock().await;
        topics
            .entry(topic.to_string())
            .or_insert_with(|| TopicLog::new(self.partitions))
            .groups
            .entry(group.to_string())
            .or_default()
            .push(tx);
        debug!(topic, group, "Consumer subscribed");
        Ok(Subscription::new(topic.to_string(), group.to_string(), rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_group_receives_every_message() {
        let broker = MemoryBroker::new(4, 16);
        let mut search = broker.subscribe("post-events", "search").await.unwrap();
        let mut notify = broker.subscribe("post-events", "notification").await.unwrap();

        broker.publish("post-events", "42", b"{}".to_vec()).await.unwrap();

        assert_eq!(search.recv().await.unwrap().key, "42");
        assert_eq!(notify.recv().await.unwrap().key, "42");
    }

    #[tokio::test]
    async fn test_per_key_order_is_preserved() {
        let broker = MemoryBroker::new(4, 64);
        let mut sub = broker.subscribe("post-events", "search").await.unwrap();

        for i in 0..10u8 {
            broker.publish("post-events", "7", vec![i]).await.unwrap();
        }
        for i in 0..10u8 {
            let message = sub.recv().await.unwrap();
            assert_eq!(message.payload, vec![i]);
            assert_eq!(message.offset, u64::from(i));
        }
    }

    #[tokio::test]
    async fn test_group_members_share_partitions() {
        let broker = MemoryBroker::new(8, 64);
        let mut a = broker.subscribe("user-events", "sync").await.unwrap();
        let mut b = broker.subscribe("user-events", "sync").await.unwrap();

        for key in 0..20 {
            broker
                .publish("user-events", &key.to_string(), Vec::new())
                .await
                .unwrap();
        }
        drop(broker);

        let mut total = 0;
        while let Some(m) = a.recv().await {
            assert_eq!(m.partition % 2, 0);
            total += 1;
        }
        while let Some(m) = b.recv().await {
            assert_eq!(m.partition % 2, 1);
            total += 1;
        }
        assert_eq!(total, 20);
    }

    #[tokio::test]
    async fn test_unavailable_broker_rejects_publish() {
        let broker = MemoryBroker::new(1, 1);
        broker.set_available(false);
        let err = broker.publish("user-events", "1", Vec::new()).await.unwrap_err();
        assert_eq!(err.kind, socialhub_core::error::ErrorKind::Broker);
        broker.set_available(true);
        assert!(broker.publish("user-events", "1", Vec::new()).await.is_ok());
    }
}
