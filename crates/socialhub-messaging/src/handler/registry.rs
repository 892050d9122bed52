//! Registry construction and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;

use super::{EventHandler, EventKind, HandleOutcome};
use crate::broker::InboundMessage;
use crate::error::DispatchError;

/// Accumulates handlers. Problems surface when [`build`](Self::build) is called.
pub struct HandlerRegistryBuilder<K: EventKind> {
    name: String,
    handlers: HashMap<K, Arc<dyn EventHandler<K>>>,
    duplicates: Vec<K>,
}

impl<K: EventKind> HandlerRegistryBuilder<K> {
    /// Register a handler under the kind it declares.
    pub fn register(mut self, handler: Arc<dyn EventHandler<K>>) -> Self {
        let kind = handler.kind();
        if self.handlers.insert(kind, handler).is_some() {
            self.duplicates.push(kind);
        }
        self
    }

    /// Build a registry that covers every kind in `K::all()`.
    pub fn build(self) -> AppResult<HandlerRegistry<K>> {
        let missing: Vec<String> = K::all()
            .iter()
            .filter(|k| !self.handlers.contains_key(*k))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::configuration(format!(
                "Handler registry '{}' has no handler for: {}",
                self.name,
                missing.join(", ")
            )));
        }
        self.build_partial()
    }

    /// Build a registry that may leave kinds unhandled. Messages of those
    /// kinds fail dispatch with [`DispatchError::NoHandlerFound`].
    pub fn build_partial(self) -> AppResult<HandlerRegistry<K>> {
        if !self.duplicates.is_empty() {
            let kinds: Vec<String> = self.duplicates.iter().map(ToString::to_string).collect();
            return Err(AppError::configuration(format!(
                "Handler registry '{}' has more than one handler for: {}",
                self.name,
                kinds.join(", ")
            )));
        }
        info!(
            registry = %self.name,
            handlers = self.handlers.len(),
            "Handler registry built"
        );
        Ok(HandlerRegistry {
            name: self.name,
            handlers: self.handlers,
        })
    }
}

/// Immutable map from event kind to its handler.
pub struct HandlerRegistry<K: EventKind> {
    name: String,
    handlers: HashMap<K, Arc<dyn EventHandler<K>>>,
}

impl<K: EventKind> std::fmt::Debug for HandlerRegistry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("name", &self.name)
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K: EventKind> HandlerRegistry<K> {
    pub fn builder(name: impl Into<String>) -> HandlerRegistryBuilder<K> {
        HandlerRegistryBuilder {
            name: name.into(),
            handlers: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handles(&self, kind: K) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Classify a message and run its handler. Never requeues.
    pub async fn dispatch(&self, message: &InboundMessage) -> Result<HandleOutcome, DispatchError> {
        let kind = K::classify(message).map_err(|source| DispatchError::Decode {
            topic: message.topic.clone(),
            source,
        })?;
        let Some(kind) = kind else {
            return Ok(HandleOutcome::Ignored);
        };
        let handler = self
            .handlers
            .get(&kind)
            .ok_or_else(|| DispatchError::NoHandlerFound {
                registry: self.name.clone(),
                kind: kind.to_string(),
            })?;

        debug!(registry = %self.name, kind = %kind, key = %message.key, "Dispatching message");
        handler.handle(message).await.map_err(DispatchError::Handler)
    }
}
