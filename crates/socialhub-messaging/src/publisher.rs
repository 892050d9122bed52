//! Domain event publisher.
//!
//! Write paths hand domain events to [`DomainEventPublisher::publish`] after
//! their write is durable. The call never blocks on the broker: events go on
//! a bounded queue drained by one background task, which serializes and
//! publishes them in submission order. Failures are logged and reported on
//! the returned [`PublishHandle`], never raised into the caller.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use socialhub_core::error::AppError;
use socialhub_core::events::{DomainEvent, EventEnvelope};
use socialhub_core::result::AppResult;

use crate::broker::MessageBroker;

struct PublishJob {
    envelope: EventEnvelope,
    done: oneshot::Sender<AppResult<()>>,
}

/// Completion of one publish. Dropping it is fine.
#[derive(Debug)]
pub struct PublishHandle {
    rx: oneshot::Receiver<AppResult<()>>,
}

impl PublishHandle {
    fn resolved(result: AppResult<()>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Wait for the broker to accept (or reject) the message.
    pub async fn wait(self) -> AppResult<()> {
        self.rx
            .await
            .unwrap_or_else(|_| Err(AppError::broker("Publisher stopped before delivery")))
    }
}

/// Cloneable front end of the publishing task.
#[derive(Debug, Clone)]
pub struct DomainEventPublisher {
    tx: mpsc::Sender<PublishJob>,
}

impl std::fmt::Debug for PublishJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishJob")
            .field("topic", &self.envelope.topic())
            .field("entity_id", &self.envelope.entity_id)
            .finish()
    }
}

impl DomainEventPublisher {
    /// Start the background publishing task.
    ///
    /// The task exits once every publisher clone has been dropped and the
    /// queue is drained.
    pub fn spawn(broker: Arc<dyn MessageBroker>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(run_publisher(broker, rx));
        (Self { tx }, task)
    }

    /// Queue one domain event for publishing.
    pub fn publish(&self, event: DomainEvent) -> PublishHandle {
        let name = event.name();
        let envelope = match event.to_envelope() {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(event = name, error = %e, "Failed to serialize domain event");
                return PublishHandle::resolved(Err(e));
            }
        };

        let (done, rx) = oneshot::channel();
        let job = PublishJob { envelope, done };
        if let Err(e) = self.tx.try_send(job) {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "publish queue is full",
                mpsc::error::TrySendError::Closed(_) => "publisher has stopped",
            };
            warn!(event = name, reason, "Dropping domain event");
            return PublishHandle::resolved(Err(AppError::broker(format!(
                "Domain event dropped: {reason}"
            ))));
        }
        PublishHandle { rx }
    }

    /// Queue several events, preserving their order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = DomainEvent>) -> Vec<PublishHandle> {
        events.into_iter().map(|e| self.publish(e)).collect()
    }
}

async fn run_publisher(broker: Arc<dyn MessageBroker>, mut rx: mpsc::Receiver<PublishJob>) {
    while let Some(job) = rx.recv().await {
        let topic = job.envelope.topic();
        let key = job.envelope.partition_key();
        let result = match job.envelope.to_bytes() {
            Ok(bytes) => broker.publish(topic, &key, bytes).await,
            Err(e) => Err(e),
        };
        match &result {
            Ok(()) => debug!(topic, key = %key, action = %job.envelope.action_type, "Event published"),
            Err(e) => warn!(topic, key = %key, error = %e, "Failed to publish event"),
        }
        let _ = job.done.send(result);
    }
    debug!("Domain event publisher stopped");
}
