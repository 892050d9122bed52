//! Search index contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use socialhub_core::result::AppResult;
use socialhub_core::types::PageResponse;
use socialhub_entity::search::{SearchDocument, SearchFilter};

/// One search index holding documents of type `D`.
///
/// Deleted ids are remembered so a redelivered create or update cannot bring
/// a deleted document back while the marker is retained.
#[async_trait]
pub trait SearchIndex<D: SearchDocument>: Send + Sync {
    /// Insert or replace unless the stored version is newer or the id was
    /// deleted. Returns `true` if the index changed.
    async fn upsert_if_newer(&self, doc: D) -> AppResult<bool>;

    /// Remove a document. Returns `false` (and changes nothing) if absent.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn get(&self, id: i64) -> AppResult<Option<D>>;

    /// Filtered, paginated query ordered by descending version.
    async fn query(&self, filter: &SearchFilter) -> AppResult<PageResponse<D>>;

    /// Forget deletion markers written before `before`. Returns how many
    /// were dropped.
    async fn purge_deleted(&self, before: DateTime<Utc>) -> AppResult<u64>;

    /// Number of live documents.
    async fn count(&self) -> AppResult<u64>;
}
