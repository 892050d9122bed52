//! Commit-time event buffer.

use socialhub_core::events::DomainEvent;

use crate::publisher::{DomainEventPublisher, PublishHandle};

/// Domain events raised inside one unit of work.
///
/// Events are only handed to the publisher by [`commit`](Self::commit),
/// which callers invoke after their write is durable. A buffer that is
/// dropped (the write failed or was rolled back) publishes nothing.
#[derive(Debug, Default)]
pub struct PendingEvents {
    events: Vec<DomainEvent>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Publish every buffered event in the order it was raised.
    pub fn commit(self, publisher: &DomainEventPublisher) -> Vec<PublishHandle> {
        publisher.publish_all(self.events)
    }
}
