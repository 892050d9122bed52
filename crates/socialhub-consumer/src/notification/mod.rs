//! Notification creation from events, and the owner-facing inbox.

pub mod directory;
pub mod fanout;
pub mod service;

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use socialhub_core::events::{ActionType, EventType};
use socialhub_core::result::AppResult;
use socialhub_database::repositories::NotificationRepository;
use socialhub_messaging::{EventKind, HandlerRegistry, InboundMessage};

pub use directory::{FriendDirectory, HttpFriendDirectory, StoreFriendDirectory};
pub use fanout::{DirectNotificationHandler, NewPostFanoutHandler};
pub use service::NotificationService;

pub const TOPICS: [&str; 2] = [EventType::Post.topic(), EventType::Notification.topic()];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A post was created; every friend of the author is notified.
    NewPost,
    /// A `notification-events` message addressed to one receiver.
    Direct,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NewPost => "NEW_POST",
            Self::Direct => "DIRECT",
        })
    }
}

#[derive(Deserialize)]
struct ActionOnly {
    #[serde(rename = "actionType", alias = "eventType")]
    action_type: ActionType,
}

impl EventKind for NotificationKind {
    fn all() -> &'static [Self] {
        &[Self::NewPost, Self::Direct]
    }

    fn classify(message: &InboundMessage) -> AppResult<Option<Self>> {
        match EventType::from_topic(&message.topic) {
            Some(EventType::Post) => {
                let action = message.decode::<ActionOnly>()?.action_type;
                Ok((action == ActionType::Create).then_some(Self::NewPost))
            }
            Some(EventType::Notification) => Ok(Some(Self::Direct)),
            _ => Ok(None),
        }
    }
}

/// Registry with one handler per [`NotificationKind`].
pub fn registry(
    notifications: Arc<dyn NotificationRepository>,
    friends: Arc<dyn FriendDirectory>,
) -> AppResult<HandlerRegistry<NotificationKind>> {
    HandlerRegistry::builder("notification")
        .register(Arc::new(NewPostFanoutHandler::new(
            notifications.clone(),
            friends,
        )))
        .register(Arc::new(DirectNotificationHandler::new(notifications)))
        .build()
}
