//! Search index maintenance from `post-events`, `comment-events` and `user-events`.

pub mod handlers;

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use socialhub_core::events::{ActionType, EventType};
use socialhub_core::result::AppResult;
use socialhub_database::Stores;
use socialhub_messaging::{EventKind, HandlerRegistry, InboundMessage};

pub use handlers::{DeleteDocumentHandler, UpsertDocumentHandler};

pub const TOPICS: [&str; 3] = [
    EventType::Post.topic(),
    EventType::Comment.topic(),
    EventType::User.topic(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    PostUpsert,
    PostDelete,
    CommentUpsert,
    CommentDelete,
    UserUpsert,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PostUpsert => "POST_UPSERT",
            Self::PostDelete => "POST_DELETE",
            Self::CommentUpsert => "COMMENT_UPSERT",
            Self::CommentDelete => "COMMENT_DELETE",
            Self::UserUpsert => "USER_UPSERT",
        })
    }
}

/// Just the action of a content event; the rest is read by the handler.
#[derive(Deserialize)]
struct ActionOnly {
    #[serde(rename = "actionType", alias = "eventType")]
    action_type: ActionType,
}

impl EventKind for SearchKind {
    fn all() -> &'static [Self] {
        &[
            Self::PostUpsert,
            Self::PostDelete,
            Self::CommentUpsert,
            Self::CommentDelete,
            Self::UserUpsert,
        ]
    }

    fn classify(message: &InboundMessage) -> AppResult<Option<Self>> {
        let kind = match EventType::from_topic(&message.topic) {
            Some(EventType::Post) => {
                if message.decode::<ActionOnly>()?.action_type.is_upsert() {
                    Self::PostUpsert
                } else {
                    Self::PostDelete
                }
            }
            Some(EventType::Comment) => {
                if message.decode::<ActionOnly>()?.action_type.is_upsert() {
                    Self::CommentUpsert
                } else {
                    Self::CommentDelete
                }
            }
            Some(EventType::User) => Self::UserUpsert,
            _ => return Ok(None),
        };
        Ok(Some(kind))
    }
}

/// Registry with one handler per [`SearchKind`], writing to the indexes in `stores`.
pub fn registry(stores: &Stores) -> AppResult<HandlerRegistry<SearchKind>> {
    HandlerRegistry::builder("search-sync")
        .register(Arc::new(UpsertDocumentHandler::posts(stores.post_index.clone())))
        .register(Arc::new(DeleteDocumentHandler::posts(stores.post_index.clone())))
        .register(Arc::new(UpsertDocumentHandler::comments(stores.comment_index.clone())))
        .register(Arc::new(DeleteDocumentHandler::comments(stores.comment_index.clone())))
        .register(Arc::new(UpsertDocumentHandler::users(stores.user_index.clone())))
        .build()
}
