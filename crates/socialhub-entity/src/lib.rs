//! # socialhub-entity
//!
//! Domain entity models for SocialHub. Relational entities additionally
//! derive `sqlx::FromRow`; projection documents and presence records are
//! plain value objects.

pub mod friendship;
pub mod notification;
pub mod otp;
pub mod presence;
pub mod search;
pub mod token;
pub mod user;
