//! # socialhub-messaging
//!
//! Cross-service event plumbing for SocialHub:
//!
//! - [`broker::MessageBroker`]: `publish(topic, key, payload)` and
//!   `subscribe(topic, group)`, with an in-process partitioned implementation
//! - [`publisher::DomainEventPublisher`]: fire-and-forget publishing off the
//!   request path, plus the [`pending::PendingEvents`] commit buffer
//! - [`handler::HandlerRegistry`]: per-consumer table from event kind to
//!   handler, validated at startup
//! - [`consumer::EventConsumer`]: subscription loop that dispatches every
//!   message and logs failures at the boundary

pub mod broker;
pub mod consumer;
pub mod error;
pub mod handler;
pub mod pending;
pub mod publisher;

pub use broker::{InboundMessage, MemoryBroker, MessageBroker, Subscription};
pub use consumer::EventConsumer;
pub use error::DispatchError;
pub use handler::{EventHandler, EventKind, HandleOutcome, HandlerRegistry};
pub use pending::PendingEvents;
pub use publisher::{DomainEventPublisher, PublishHandle};
