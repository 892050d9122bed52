//! In-process domain events and their envelope mapping.

use super::action::ActionType;
use super::content::{CommentEventPayload, CommentSnapshot, PostEventPayload, PostSnapshot};
use super::envelope::EventEnvelope;
use super::notification::{NotificationEventPayload, NotificationType};
use super::topic::EventType;
use super::user::{UserEventPayload, UserEventType};
use crate::result::AppResult;

/// Reference type recorded on friendship notifications.
pub const REFERENCE_FRIENDSHIP: &str = "FRIENDSHIP";
/// Reference type recorded on post notifications.
pub const REFERENCE_POST: &str = "POST";

/// A state change raised by a write path, before it is put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// A user account was created or its profile fields changed.
    UserChanged(UserEventPayload),
    /// A post was created, updated or deleted.
    PostChanged {
        action: ActionType,
        post_id: i64,
        post: Option<PostSnapshot>,
    },
    /// A comment was created, updated, deleted or replied to.
    CommentChanged {
        action: ActionType,
        comment_id: i64,
        comment: Option<CommentSnapshot>,
    },
    /// `sender_id` asked `receiver_id` to become friends.
    FriendRequestSent {
        friendship_id: i64,
        sender_id: i64,
        sender_name: String,
        receiver_id: i64,
    },
    /// `sender_id` accepted a friendship; `receiver_id` is told about it.
    FriendshipAccepted {
        friendship_id: i64,
        sender_id: i64,
        sender_name: String,
        receiver_id: i64,
    },
    /// `liker_id` liked a post written by `post_author_id`.
    PostLiked {
        post_id: i64,
        post_author_id: i64,
        liker_id: i64,
        liker_name: String,
    },
}

impl DomainEvent {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserChanged(p) => match p.event_type {
                UserEventType::UserCreated => "USER_CREATED",
                UserEventType::UserUpdated => "USER_UPDATED",
            },
            Self::PostChanged { .. } => "POST_CHANGED",
            Self::CommentChanged { .. } => "COMMENT_CHANGED",
            Self::FriendRequestSent { .. } => "FRIEND_REQUEST_SENT",
            Self::FriendshipAccepted { .. } => "FRIENDSHIP_ACCEPTED",
            Self::PostLiked { .. } => "POST_LIKED",
        }
    }

    /// Map the event onto its topic, action, partition key and wire payload.
    pub fn to_envelope(&self) -> AppResult<EventEnvelope> {
        match self {
            Self::UserChanged(payload) => {
                let action = match payload.event_type {
                    UserEventType::UserCreated => ActionType::Create,
                    UserEventType::UserUpdated => ActionType::Update,
                };
                EventEnvelope::new(EventType::User, action, payload.user_id, payload)
            }
            Self::PostChanged {
                action,
                post_id,
                post,
            } => EventEnvelope::new(
                EventType::Post,
                *action,
                *post_id,
                &PostEventPayload {
                    action_type: *action,
                    post_id: *post_id,
                    post: post.clone(),
                },
            ),
            Self::CommentChanged {
                action,
                comment_id,
                comment,
            } => EventEnvelope::new(
                EventType::Comment,
                *action,
                *comment_id,
                &CommentEventPayload {
                    action_type: *action,
                    comment_id: *comment_id,
                    comment: comment.clone(),
                },
            ),
            Self::FriendRequestSent {
                friendship_id,
                sender_id,
                sender_name,
                receiver_id,
            } => notification_envelope(NotificationEventPayload {
                notification_type: NotificationType::FriendRequest,
                message: format!("{sender_name} sent you a friend request"),
                sender_id: *sender_id,
                receiver_id: *receiver_id,
                reference_id: Some(*friendship_id),
                reference_type: Some(REFERENCE_FRIENDSHIP.to_string()),
            }),
            Self::FriendshipAccepted {
                friendship_id,
                sender_id,
                sender_name,
                receiver_id,
            } => notification_envelope(NotificationEventPayload {
                notification_type: NotificationType::AcceptFriendship,
                message: format!("{sender_name} accepted your friend request"),
                sender_id: *sender_id,
                receiver_id: *receiver_id,
                reference_id: Some(*friendship_id),
                reference_type: Some(REFERENCE_FRIENDSHIP.to_string()),
            }),
            Self::PostLiked {
                post_id,
                post_author_id,
                liker_id,
                liker_name,
            } => notification_envelope(NotificationEventPayload {
                notification_type: NotificationType::LikePost,
                message: format!("{liker_name} liked your post"),
                sender_id: *liker_id,
                receiver_id: *post_author_id,
                reference_id: Some(*post_id),
                reference_type: Some(REFERENCE_POST.to_string()),
            }),
        }
    }
}

/// Direct notifications are keyed by receiver so one inbox sees them in order.
fn notification_envelope(payload: NotificationEventPayload) -> AppResult<EventEnvelope> {
    EventEnvelope::new(
        EventType::Notification,
        ActionType::Create,
        payload.receiver_id,
        &payload,
    )
}
