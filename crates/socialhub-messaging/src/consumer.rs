//! Consumer loop.
//!
//! One task per subscribed topic receives messages and dispatches them
//! through the service's [`HandlerRegistry`]. Errors stop at this boundary:
//! they are logged and the loop moves on. Transient handler failures are
//! redelivered a bounded number of times before the message is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use socialhub_core::result::AppResult;

use crate::broker::{InboundMessage, MessageBroker, Subscription};
use crate::error::DispatchError;
use crate::handler::{EventKind, HandleOutcome, HandlerRegistry};

/// Delivery attempts for a message whose handler fails transiently.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Base delay between redeliveries; multiplied by the attempt number.
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Running totals, mostly for health output and tests.
#[derive(Debug, Default)]
pub struct ConsumerStats {
    applied: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl ConsumerStats {
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Messages fully processed, whatever the outcome.
    pub fn processed(&self) -> u64 {
        self.applied() + self.skipped() + self.failed()
    }
}

/// Drives one service's handler registry from broker subscriptions.
#[derive(Debug)]
pub struct EventConsumer<K: EventKind> {
    registry: Arc<HandlerRegistry<K>>,
    stats: Arc<ConsumerStats>,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl<K: EventKind> EventConsumer<K> {
    pub fn new(registry: HandlerRegistry<K>) -> Self {
        Self {
            registry: Arc::new(registry),
            stats: Arc::new(ConsumerStats::default()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Override the redelivery policy for transient failures.
    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = backoff;
        self
    }

    pub fn stats(&self) -> Arc<ConsumerStats> {
        Arc::clone(&self.stats)
    }

    pub fn name(&self) -> &str {
        self.registry.name()
    }

    /// Process one message to completion. Never returns an error.
    pub async fn process(&self, message: &InboundMessage) -> Option<HandleOutcome> {
        let mut attempt = 1;
        loop {
            match self.registry.dispatch(message).await {
                Ok(outcome) => {
                    match &outcome {
                        HandleOutcome::Applied => {
                            self.stats.applied.fetch_add(1, Ordering::SeqCst);
                            debug!(
                                consumer = %self.name(),
                                topic = %message.topic,
                                key = %message.key,
                                offset = message.offset,
                                "Message applied"
                            );
                        }
                        HandleOutcome::Skipped(reason) => {
                            self.stats.skipped.fetch_add(1, Ordering::SeqCst);
                            debug!(
                                consumer = %self.name(),
                                topic = %message.topic,
                                key = %message.key,
                                reason = %reason,
                                "Message skipped"
                            );
                        }
                        HandleOutcome::Ignored => {
                            self.stats.skipped.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                    return Some(outcome);
                }
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        consumer = %self.name(),
                        topic = %message.topic,
                        key = %message.key,
                        attempt,
                        error = %e,
                        "Transient failure, redelivering"
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.stats.failed.fetch_add(1, Ordering::SeqCst);
                    self.log_failure(message, &e);
                    return None;
                }
            }
        }
    }

    fn log_failure(&self, message: &InboundMessage, err: &DispatchError) {
        match err {
            DispatchError::NoHandlerFound { .. } => error!(
                consumer = %self.name(),
                topic = %message.topic,
                key = %message.key,
                error = %err,
                "No handler found, message dropped"
            ),
            DispatchError::Decode { .. } => warn!(
                consumer = %self.name(),
                topic = %message.topic,
                key = %message.key,
                error = %err,
                "Malformed message dropped"
            ),
            DispatchError::Handler(_) => warn!(
                consumer = %self.name(),
                topic = %message.topic,
                key = %message.key,
                error = %err,
                "Handler failed, message dropped"
            ),
        }
    }

    /// Receive and process until the subscription closes or shutdown is signalled.
    pub async fn run(self: Arc<Self>, mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) {
        info!(
            consumer = %self.name(),
            topic = %subscription.topic(),
            group = %subscription.group(),
            "Consumer started"
        );
        loop {
            tokio::select! {
                message = subscription.recv() => {
                    match message {
                        Some(message) => {
                            self.process(&message).await;
                        }
                        None => break,
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(consumer = %self.name(), topic = %subscription.topic(), "Consumer stopped");
    }

    /// Subscribe to every topic as `group` and spawn one loop per topic.
    pub async fn spawn(
        self: Arc<Self>,
        broker: &dyn MessageBroker,
        topics: &[&str],
        group: &str,
        shutdown: watch::Receiver<bool>,
    ) -> AppResult<Vec<JoinHandle<()>>> {
        let mut tasks = Vec::with_capacity(topics.len());
        for topic in topics {
            let subscription = broker.subscribe(topic, group).await?;
            tasks.push(tokio::spawn(
                Arc::clone(&self).run(subscription, shutdown.clone()),
            ));
        }
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::MemoryBroker;
    use crate::handler::EventHandler;
    use async_trait::async_trait;
    use socialhub_core::error::AppError;
    use std::fmt;
    use std::sync::atomic::AtomicU32;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Any;

    impl fmt::Display for Any {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("ANY")
        }
    }

    impl EventKind for Any {
        fn all() -> &'static [Self] {
            &[Any]
        }

        fn classify(_message: &InboundMessage) -> AppResult<Option<Self>> {
            Ok(Some(Any))
        }
    }

    /// Fails transiently `failures` times, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl EventHandler<Any> for Flaky {
        fn kind(&self) -> Any {
            Any
        }

        async fn handle(&self, _message: &InboundMessage) -> AppResult<HandleOutcome> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(AppError::service_unavailable("store down"))
            } else {
                Ok(HandleOutcome::Applied)
            }
        }
    }

    fn consumer(failures: u32) -> (Arc<EventConsumer<Any>>, Arc<Flaky>) {
        let handler = Arc::new(Flaky {
            failures,
            calls: AtomicU32::new(0),
        });
        let registry = HandlerRegistry::builder("flaky")
            .register(handler.clone())
            .build()
            .unwrap();
        let consumer = EventConsumer::new(registry).with_retry(3, Duration::from_millis(1));
        (Arc::new(consumer), handler)
    }

    fn message() -> InboundMessage {
        InboundMessage {
            topic: "t".to_string(),
            key: "1".to_string(),
            payload: Vec::new(),
            partition: 0,
            offset: 0,
        }
    }

    #[tokio::test]
    async fn test_transient_failure_is_redelivered() {
        let (consumer, handler) = consumer(2);
        assert_eq!(consumer.process(&message()).await, Some(HandleOutcome::Applied));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (consumer, handler) = consumer(10);
        assert_eq!(consumer.process(&message()).await, None);
        assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
        assert_eq!(consumer.stats().failed(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let broker = MemoryBroker::new(1, 8);
        let (consumer, _) = consumer(0);
        let (tx, rx) = watch::channel(false);
        let tasks = consumer.clone().spawn(&broker, &["t"], "g", rx).await.unwrap();

        broker.publish("t", "1", Vec::new()).await.unwrap();
        while consumer.stats().processed() < 1 {
            tokio::task::yield_now().await;
        }

        tx.send(true).unwrap();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(consumer.stats().applied(), 1);
    }
}
