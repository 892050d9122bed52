//! Event envelope, topic registry and wire payloads.
//!
//! Every domain state change crosses service boundaries as an
//! [`EventEnvelope`] published on the topic bound to its [`EventType`].
//! Consumers decode the payload into the structs in this module, ignoring
//! unknown fields and treating missing optional fields as absent.

pub mod action;
pub mod content;
pub mod domain;
pub mod envelope;
pub mod notification;
pub mod topic;
pub mod user;

pub use self::action::ActionType;
pub use self::content::{
    CommentEventPayload, CommentSnapshot, ContentAuthor, PostEventPayload, PostSnapshot,
};
pub use self::domain::{DomainEvent, REFERENCE_FRIENDSHIP, REFERENCE_POST};
pub use self::envelope::EventEnvelope;
pub use self::notification::{NotificationEventPayload, NotificationType};
pub use self::topic::EventType;
pub use self::user::{UserEventPayload, UserEventType};
