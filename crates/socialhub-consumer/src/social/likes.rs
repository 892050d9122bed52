//! Post likes.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use socialhub_core::events::DomainEvent;
use socialhub_core::result::AppResult;
use socialhub_database::repositories::ProfileRepository;
use socialhub_messaging::{DomainEventPublisher, PendingEvents};

use super::display_name;

/// Records likes and notifies the post author on the first like by a user.
#[derive(Clone)]
pub struct LikeService {
    likes: Arc<DashMap<(i64, i64), ()>>,
    profiles: Arc<dyn ProfileRepository>,
    publisher: DomainEventPublisher,
}

impl std::fmt::Debug for LikeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeService")
            .field("likes", &self.likes.len())
            .finish_non_exhaustive()
    }
}

impl LikeService {
    pub fn new(profiles: Arc<dyn ProfileRepository>, publisher: DomainEventPublisher) -> Self {
        Self {
            likes: Arc::new(DashMap::new()),
            profiles,
            publisher,
        }
    }

    /// Like a post. Returns `false` if the user had already liked it.
    pub async fn like(&self, post_id: i64, post_author_id: i64, liker_id: i64) -> AppResult<bool> {
        match self.likes.entry((post_id, liker_id)) {
            Entry::Occupied(_) => return Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }

        let mut events = PendingEvents::new();
        events.push(DomainEvent::PostLiked {
            post_id,
            post_author_id,
            liker_id,
            liker_name: display_name(&self.profiles, liker_id).await,
        });
        events.commit(&self.publisher);
        debug!(post_id, liker_id, "Post liked");
        Ok(true)
    }

    /// Remove a like. Returns `false` if there was none.
    pub fn unlike(&self, post_id: i64, liker_id: i64) -> bool {
        self.likes.remove(&(post_id, liker_id)).is_some()
    }

    pub fn like_count(&self, post_id: i64) -> usize {
        self.likes.iter().filter(|e| e.key().0 == post_id).count()
    }
}
