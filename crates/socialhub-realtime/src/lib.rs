//! # socialhub-realtime
//!
//! Presence tracking for chat sessions. The registry is an explicit value
//! shared by reference (usually behind an `Arc` in application state);
//! readers only ever see point-in-time snapshots.

pub mod presence;

pub use presence::{PresenceChange, PresenceRegistry};
