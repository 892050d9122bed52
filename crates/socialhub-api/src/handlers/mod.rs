//! HTTP handlers grouped by domain.

pub mod auth;
pub mod friendship;
pub mod health;
pub mod internal;
pub mod like;
pub mod notification;
pub mod presence;
pub mod search;
pub mod user;
