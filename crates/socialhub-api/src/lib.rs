//! # socialhub-api
//!
//! HTTP API layer for SocialHub built on Axum.
//!
//! Provides the auth endpoints (including token validation), the gateway
//! and per-service authentication filters, the identity extractor,
//! notification, friendship, like, presence and search routes, the internal
//! friend lookup, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
