//! Event handler registry.
//!
//! Each consumer service declares a closed set of event kinds (an
//! [`EventKind`] enum) and registers exactly one [`EventHandler`] per kind at
//! startup. Building the registry fails loudly on duplicates and, for
//! [`HandlerRegistryBuilder::build`], on kinds left without a handler.

pub mod registry;

use std::fmt;
use std::hash::Hash;

use async_trait::async_trait;

use socialhub_core::result::AppResult;

use crate::broker::InboundMessage;

pub use registry::{HandlerRegistry, HandlerRegistryBuilder};

/// The statically known set of event kinds one consumer handles.
pub trait EventKind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every kind in the set.
    fn all() -> &'static [Self];

    /// Map an inbound message to its kind.
    ///
    /// `Ok(None)` means the message is not meant for this consumer.
    /// `Err` means it is malformed.
    fn classify(message: &InboundMessage) -> AppResult<Option<Self>>;
}

/// What a handler did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The handler changed its store.
    Applied,
    /// The handler deliberately left its store unchanged (duplicate, stale, absent).
    Skipped(String),
    /// The message was not addressed to this consumer.
    Ignored,
}

impl HandleOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }
}

/// Handles messages of a single kind.
#[async_trait]
pub trait EventHandler<K: EventKind>: Send + Sync {
    /// The kind this handler is registered under.
    fn kind(&self) -> K;

    /// Apply the message. Must be idempotent under redelivery.
    async fn handle(&self, message: &InboundMessage) -> AppResult<HandleOutcome>;
}
