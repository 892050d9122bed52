//! In-memory friendship store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_entity::friendship::{Friendship, FriendshipStatus};

use crate::repositories::FriendshipRepository;

#[derive(Debug)]
pub struct MemoryFriendshipRepository {
    friendships: DashMap<i64, Friendship>,
    /// Unordered pair → friendship id.
    pairs: DashMap<(i64, i64), i64>,
    next_id: AtomicI64,
}

impl MemoryFriendshipRepository {
    pub fn new() -> Self {
        Self {
            friendships: DashMap::new(),
            pairs: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryFriendshipRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn pair(a: i64, b: i64) -> (i64, i64) {
    (a.min(b), a.max(b))
}

#[async_trait]
impl FriendshipRepository for MemoryFriendshipRepository {
    async fn create_request(
        &self,
        requester_id: i64,
        addressee_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Friendship> {
        if requester_id == addressee_id {
            return Err(AppError::validation("Cannot befriend yourself"));
        }
        let Entry::Vacant(slot) = self.pairs.entry(pair(requester_id, addressee_id)) else {
            return Err(AppError::conflict("Friendship already exists"));
        };
        let friendship = Friendship {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            requester_id,
            addressee_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.friendships.insert(friendship.id, friendship.clone());
        slot.insert(friendship.id);
        Ok(friendship)
    }

    async fn find(&self, id: i64) -> AppResult<Option<Friendship>> {
        Ok(self.friendships.get(&id).map(|f| f.clone()))
    }

    async fn resolve(
        &self,
        id: i64,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Friendship>> {
        Ok(match self.friendships.get_mut(&id) {
            Some(mut f) if f.status == FriendshipStatus::Pending => {
                f.status = status;
                f.updated_at = now;
                Some(f.clone())
            }
            _ => None,
        })
    }

    async fn friend_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .friendships
            .iter()
            .filter(|f| f.status == FriendshipStatus::Accepted)
            .filter_map(|f| f.other_party(user_id))
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_accepted_friendships_count() {
        let repo = MemoryFriendshipRepository::new();
        let now = Utc::now();
        let a = repo.create_request(1, 2, now).await.unwrap();
        repo.create_request(3, 1, now).await.unwrap();
        assert!(repo.create_request(2, 1, now).await.is_err());

        repo.resolve(a.id, FriendshipStatus::Accepted, now).await.unwrap();
        assert!(repo
            .resolve(a.id, FriendshipStatus::Declined, now)
            .await
            .unwrap()
            .is_none());
        assert_eq!(repo.friend_ids(1).await.unwrap(), vec![2]);
        assert_eq!(repo.friend_ids(2).await.unwrap(), vec![1]);
        assert!(repo.friend_ids(3).await.unwrap().is_empty());
    }
}
