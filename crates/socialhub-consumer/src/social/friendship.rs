//! Friend requests.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use socialhub_core::error::AppError;
use socialhub_core::events::DomainEvent;
use socialhub_core::result::AppResult;
use socialhub_database::repositories::{FriendshipRepository, ProfileRepository};
use socialhub_entity::friendship::{Friendship, FriendshipStatus};
use socialhub_messaging::{DomainEventPublisher, PendingEvents};

use super::display_name;

/// Sends, accepts and declines friend requests.
///
/// A request notifies the addressee; an acceptance notifies the original
/// requester. Declines are silent.
#[derive(Clone)]
pub struct FriendshipService {
    friendships: Arc<dyn FriendshipRepository>,
    profiles: Arc<dyn ProfileRepository>,
    publisher: DomainEventPublisher,
}

impl std::fmt::Debug for FriendshipService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FriendshipService").finish_non_exhaustive()
    }
}

impl FriendshipService {
    pub fn new(
        friendships: Arc<dyn FriendshipRepository>,
        profiles: Arc<dyn ProfileRepository>,
        publisher: DomainEventPublisher,
    ) -> Self {
        Self {
            friendships,
            profiles,
            publisher,
        }
    }

    pub async fn send_request(&self, requester_id: i64, addressee_id: i64) -> AppResult<Friendship> {
        if requester_id == addressee_id {
            return Err(AppError::validation("Cannot send a friend request to yourself"));
        }
        let friendship = self
            .friendships
            .create_request(requester_id, addressee_id, Utc::now())
            .await?;

        let mut events = PendingEvents::new();
        events.push(DomainEvent::FriendRequestSent {
            friendship_id: friendship.id,
            sender_id: requester_id,
            sender_name: display_name(&self.profiles, requester_id).await,
            receiver_id: addressee_id,
        });
        events.commit(&self.publisher);

        info!(friendship_id = friendship.id, requester_id, addressee_id, "Friend request sent");
        Ok(friendship)
    }

    /// Accept a pending request. Only the addressee may accept.
    pub async fn accept(&self, friendship_id: i64, user_id: i64) -> AppResult<Friendship> {
        let friendship = self.resolve(friendship_id, user_id, FriendshipStatus::Accepted).await?;

        let mut events = PendingEvents::new();
        events.push(DomainEvent::FriendshipAccepted {
            friendship_id,
            sender_id: user_id,
            sender_name: display_name(&self.profiles, user_id).await,
            receiver_id: friendship.requester_id,
        });
        events.commit(&self.publisher);

        info!(friendship_id, user_id, requester_id = friendship.requester_id, "Friend request accepted");
        Ok(friendship)
    }

    /// Decline a pending request. Only the addressee may decline.
    pub async fn decline(&self, friendship_id: i64, user_id: i64) -> AppResult<Friendship> {
        self.resolve(friendship_id, user_id, FriendshipStatus::Declined).await
    }

    pub async fn friend_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        self.friendships.friend_ids(user_id).await
    }

    async fn resolve(
        &self,
        friendship_id: i64,
        user_id: i64,
        status: FriendshipStatus,
    ) -> AppResult<Friendship> {
        let existing = self
            .friendships
            .find(friendship_id)
            .await?
            .filter(|f| f.involves(user_id))
            .ok_or_else(|| AppError::not_found(format!("Friend request {friendship_id} not found")))?;
        if existing.addressee_id != user_id {
            return Err(AppError::authorization(
                "Only the addressee can answer a friend request",
            ));
        }
        self.friendships
            .resolve(friendship_id, status, Utc::now())
            .await?
            .ok_or_else(|| AppError::conflict("Friend request was already answered"))
    }
}
