//! # socialhub-database
//!
//! Repository traits for every SocialHub store, with two backends:
//! concurrent in-memory maps and PostgreSQL through sqlx. Every mutation
//! that can race (revocation, OTP supersede, notification read state,
//! projection upserts) is a single conditional operation in both backends.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::Stores;
