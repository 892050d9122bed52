//! Presence domain entities.

pub mod model;

pub use model::PresenceRecord;
