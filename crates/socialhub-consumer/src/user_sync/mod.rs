//! User profile replication from `user-events`.

pub mod handlers;

use std::fmt;
use std::sync::Arc;

use socialhub_core::events::{EventType, UserEventPayload, UserEventType};
use socialhub_core::result::AppResult;
use socialhub_database::repositories::ProfileRepository;
use socialhub_messaging::{EventKind, HandlerRegistry, InboundMessage};

pub use handlers::{ProfileCreatedHandler, ProfileUpdatedHandler};

/// Topics the user-sync consumer subscribes to.
pub const TOPICS: [&str; 1] = [EventType::User.topic()];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserSyncKind {
    UserCreated,
    UserUpdated,
}

impl fmt::Display for UserSyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserCreated => "USER_CREATED",
            Self::UserUpdated => "USER_UPDATED",
        })
    }
}

impl EventKind for UserSyncKind {
    fn all() -> &'static [Self] {
        &[Self::UserCreated, Self::UserUpdated]
    }

    fn classify(message: &InboundMessage) -> AppResult<Option<Self>> {
        if message.topic != EventType::User.topic() {
            return Ok(None);
        }
        let payload: UserEventPayload = message.decode()?;
        Ok(Some(match payload.event_type {
            UserEventType::UserCreated => Self::UserCreated,
            UserEventType::UserUpdated => Self::UserUpdated,
        }))
    }
}

/// Registry with one handler per [`UserSyncKind`].
pub fn registry(profiles: Arc<dyn ProfileRepository>) -> AppResult<HandlerRegistry<UserSyncKind>> {
    HandlerRegistry::builder("user-sync")
        .register(Arc::new(ProfileCreatedHandler::new(profiles.clone())))
        .register(Arc::new(ProfileUpdatedHandler::new(profiles)))
        .build()
}
