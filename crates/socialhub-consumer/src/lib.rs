//! # socialhub-consumer
//!
//! The downstream side of SocialHub's event propagation, plus the write
//! paths that feed notifications.
//!
//! ## Consumers
//!
//! Each consumer declares a closed [`EventKind`](socialhub_messaging::EventKind)
//! set, builds its [`HandlerRegistry`](socialhub_messaging::HandlerRegistry)
//! exhaustively at startup and only ever applies idempotent operations:
//!
//! - `user_sync`: replicated user profiles (skip-if-exists on create,
//!   last-write-wins on update)
//! - `search_sync`: post, comment and user search indexes (last-write-wins
//!   upserts, skip-if-absent deletes, tombstones)
//! - `notification`: new-post fan-out to friends and direct notifications,
//!   plus the owner-facing [`NotificationService`]
//!
//! ## Write paths
//!
//! - `social`: friend requests, acceptances and post likes, which raise
//!   notification events

pub mod notification;
pub mod search_sync;
pub mod social;
pub mod user_sync;

pub use notification::{
    FriendDirectory, HttpFriendDirectory, NotificationKind, NotificationService,
    StoreFriendDirectory,
};
pub use search_sync::SearchKind;
pub use social::{FriendshipService, LikeService};
pub use user_sync::UserSyncKind;
