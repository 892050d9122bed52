//! Presence registry.

pub mod registry;

pub use registry::{PresenceChange, PresenceRegistry};
