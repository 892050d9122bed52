//! Dispatch errors raised at the consumer boundary.

use thiserror::Error;

use socialhub_core::error::AppError;

/// Why a message could not be handled.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The message classified to a kind no handler was registered for.
    #[error("no handler registered for '{kind}' in registry '{registry}'")]
    NoHandlerFound { registry: String, kind: String },
    /// The message could not be decoded or classified.
    #[error("malformed message on '{topic}': {source}")]
    Decode {
        topic: String,
        #[source]
        source: AppError,
    },
    /// The handler ran and failed.
    #[error("handler failed: {0}")]
    Handler(#[source] AppError),
}

impl DispatchError {
    /// Whether redelivering the same message could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Handler(e) if e.is_transient())
    }
}
