//! Axum middleware stack.

pub mod auth;

pub use auth::{bearer_token, gateway_filter, service_filter};
