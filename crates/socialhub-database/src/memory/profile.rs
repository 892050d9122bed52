//! In-memory replicated profile store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use socialhub_core::result::AppResult;
use socialhub_entity::user::UserProfile;

use crate::repositories::ProfileRepository;

#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    profiles: DashMap<i64, UserProfile>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn insert_if_absent(&self, profile: UserProfile) -> AppResult<bool> {
        Ok(match self.profiles.entry(profile.user_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(profile);
                true
            }
        })
    }

    async fn upsert_if_newer(&self, profile: UserProfile) -> AppResult<bool> {
        Ok(match self.profiles.entry(profile.user_id) {
            Entry::Occupied(mut existing) => {
                if profile.version() >= existing.get().version() && *existing.get() != profile {
                    existing.insert(profile);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(profile);
                true
            }
        })
    }

    async fn find(&self, user_id: i64) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.get(&user_id).map(|p| p.clone()))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.profiles.len() as u64)
    }
}
