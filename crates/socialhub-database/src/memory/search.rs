//! In-memory search index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use socialhub_core::result::AppResult;
use socialhub_core::types::PageResponse;
use socialhub_entity::search::{SearchDocument, SearchFilter};

use crate::repositories::SearchIndex;

/// A slot is either a live document or the marker left by its deletion,
/// stamped with when the delete landed.
#[derive(Debug, Clone)]
enum Slot<D> {
    Live(D),
    Deleted(DateTime<Utc>),
}

#[derive(Debug)]
pub struct MemorySearchIndex<D> {
    slots: DashMap<i64, Slot<D>>,
}

impl<D: SearchDocument> MemorySearchIndex<D> {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }
}

impl<D: SearchDocument> Default for MemorySearchIndex<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: SearchDocument> SearchIndex<D> for MemorySearchIndex<D> {
    async fn upsert_if_newer(&self, doc: D) -> AppResult<bool> {
        Ok(match self.slots.entry(doc.id()) {
            Entry::Vacant(slot) => {
                slot.insert(Slot::Live(doc));
                true
            }
            Entry::Occupied(mut slot) => {
                let accept = match slot.get() {
                    Slot::Deleted(_) => false,
                    Slot::Live(existing) => doc.version() >= existing.version(),
                };
                if accept {
                    slot.insert(Slot::Live(doc));
                }
                accept
            }
        })
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(match self.slots.get_mut(&id) {
            Some(mut slot) if matches!(*slot, Slot::Live(_)) => {
                *slot = Slot::Deleted(Utc::now());
                true
            }
            _ => false,
        })
    }

    async fn get(&self, id: i64) -> AppResult<Option<D>> {
        Ok(self.slots.get(&id).and_then(|slot| match &*slot {
            Slot::Live(doc) => Some(doc.clone()),
            Slot::Deleted(_) => None,
        }))
    }

    async fn query(&self, filter: &SearchFilter) -> AppResult<PageResponse<D>> {
        let mut hits: Vec<D> = self
            .slots
            .iter()
            .filter_map(|slot| match slot.value() {
                Slot::Live(doc) if doc.matches(filter) => Some(doc.clone()),
                _ => None,
            })
            .collect();
        hits.sort_by(|a, b| b.version().cmp(&a.version()).then(b.id().cmp(&a.id())));
        Ok(PageResponse::from_vec(hits, &filter.page))
    }

    async fn purge_deleted(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let tombstones = self.slots.len();
        self.slots
            .retain(|_, slot| !matches!(slot, Slot::Deleted(at) if *at < before));
        Ok(tombstones.saturating_sub(self.slots.len()) as u64)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self
            .slots
            .iter()
            .filter(|slot| matches!(slot.value(), Slot::Live(_)))
            .count() as u64)
    }
}
