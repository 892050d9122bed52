//! Notification handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use socialhub_core::events::{
    NotificationEventPayload, NotificationType, PostEventPayload, REFERENCE_POST,
};
use socialhub_core::result::AppResult;
use socialhub_database::repositories::NotificationRepository;
use socialhub_entity::notification::NewNotification;
use socialhub_messaging::{EventHandler, HandleOutcome, InboundMessage};

use super::NotificationKind;
use super::directory::FriendDirectory;

/// Notifies every friend of a post's author.
///
/// The friend list is resolved while handling. If the lookup fails the
/// message is still considered handled and nobody is notified.
pub struct NewPostFanoutHandler {
    notifications: Arc<dyn NotificationRepository>,
    friends: Arc<dyn FriendDirectory>,
}

impl NewPostFanoutHandler {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        friends: Arc<dyn FriendDirectory>,
    ) -> Self {
        Self {
            notifications,
            friends,
        }
    }
}

#[async_trait]
impl EventHandler<NotificationKind> for NewPostFanoutHandler {
    fn kind(&self) -> NotificationKind {
        NotificationKind::NewPost
    }

    async fn handle(&self, message: &InboundMessage) -> AppResult<HandleOutcome> {
        let payload: PostEventPayload = message.decode()?;
        let Some(post) = payload.post else {
            return Ok(HandleOutcome::skipped("post event carries no author"));
        };
        let author_id = post.author.user_id;

        let friends = match self.friends.friend_ids(author_id).await {
            Ok(friends) => friends,
            Err(e) => {
                warn!(
                    post_id = payload.post_id,
                    author_id,
                    error = %e,
                    "Friend lookup failed, skipping new-post fan-out"
                );
                return Ok(HandleOutcome::skipped("friend lookup failed"));
            }
        };

        let author_name = post.author.display_name();
        let mut created = 0usize;
        for friend_id in friends.into_iter().filter(|id| *id != author_id) {
            let inserted = self
                .notifications
                .insert(NewNotification {
                    notification_type: NotificationType::NewPost,
                    message: format!("{author_name} published a new post"),
                    sender_id: author_id,
                    receiver_id: friend_id,
                    reference_id: Some(payload.post_id),
                    reference_type: Some(REFERENCE_POST.to_string()),
                })
                .await?;
            if inserted.is_some() {
                created += 1;
            }
        }

        if created == 0 {
            return Ok(HandleOutcome::skipped("no new recipients"));
        }
        info!(post_id = payload.post_id, author_id, created, "New-post notifications created");
        Ok(HandleOutcome::Applied)
    }
}

/// Stores a `notification-events` message for its receiver.
pub struct DirectNotificationHandler {
    notifications: Arc<dyn NotificationRepository>,
}

impl DirectNotificationHandler {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl EventHandler<NotificationKind> for DirectNotificationHandler {
    fn kind(&self) -> NotificationKind {
        NotificationKind::Direct
    }

    async fn handle(&self, message: &InboundMessage) -> AppResult<HandleOutcome> {
        let payload: NotificationEventPayload = message.decode()?;
        if payload.sender_id == payload.receiver_id {
            return Ok(HandleOutcome::skipped("sender is the receiver"));
        }

        let receiver_id = payload.receiver_id;
        let notification_type = payload.notification_type.clone();
        match self.notifications.insert(NewNotification::from(payload)).await? {
            Some(notification) => {
                debug!(
                    notification_id = %notification.id,
                    receiver_id,
                    notification_type = %notification_type,
                    "Notification created"
                );
                Ok(HandleOutcome::Applied)
            }
            None => Ok(HandleOutcome::skipped("duplicate notification")),
        }
    }
}
