//! # socialhub-core
//!
//! Core crate for SocialHub. Contains configuration schemas, the topic
//! registry, event envelopes and wire payloads, domain events,
//! pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SocialHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
