//! Generic index upsert and delete handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use socialhub_core::events::{CommentEventPayload, PostEventPayload, UserEventPayload};
use socialhub_core::result::AppResult;
use socialhub_database::repositories::SearchIndex;
use socialhub_entity::search::{CommentDocument, PostDocument, SearchDocument, UserDocument};
use socialhub_messaging::{EventHandler, HandleOutcome, InboundMessage};

use super::SearchKind;

type ExtractDocument<D> = fn(&InboundMessage) -> AppResult<Option<D>>;
type ExtractId = fn(&InboundMessage) -> AppResult<i64>;

/// Writes the document carried by a create/update/reply event unless the
/// index holds a newer version or the id was deleted.
pub struct UpsertDocumentHandler<D: SearchDocument> {
    kind: SearchKind,
    index: Arc<dyn SearchIndex<D>>,
    extract: ExtractDocument<D>,
}

impl UpsertDocumentHandler<PostDocument> {
    pub fn posts(index: Arc<dyn SearchIndex<PostDocument>>) -> Self {
        Self {
            kind: SearchKind::PostUpsert,
            index,
            extract: |m| {
                Ok(m.decode::<PostEventPayload>()?
                    .snapshot()
                    .as_ref()
                    .map(PostDocument::from))
            },
        }
    }
}

impl UpsertDocumentHandler<CommentDocument> {
    pub fn comments(index: Arc<dyn SearchIndex<CommentDocument>>) -> Self {
        Self {
            kind: SearchKind::CommentUpsert,
            index,
            extract: |m| {
                Ok(m.decode::<CommentEventPayload>()?
                    .snapshot()
                    .as_ref()
                    .map(CommentDocument::from))
            },
        }
    }
}

impl UpsertDocumentHandler<UserDocument> {
    pub fn users(index: Arc<dyn SearchIndex<UserDocument>>) -> Self {
        Self {
            kind: SearchKind::UserUpsert,
            index,
            extract: |m| Ok(Some(UserDocument::from(&m.decode::<UserEventPayload>()?))),
        }
    }
}

#[async_trait]
impl<D: SearchDocument> EventHandler<SearchKind> for UpsertDocumentHandler<D> {
    fn kind(&self) -> SearchKind {
        self.kind
    }

    async fn handle(&self, message: &InboundMessage) -> AppResult<HandleOutcome> {
        let Some(doc) = (self.extract)(message)? else {
            return Ok(HandleOutcome::skipped("event carries no snapshot"));
        };
        let id = doc.id();
        if self.index.upsert_if_newer(doc).await? {
            debug!(index = D::INDEX, id, "Document indexed");
            Ok(HandleOutcome::Applied)
        } else {
            Ok(HandleOutcome::skipped("indexed copy is newer or deleted"))
        }
    }
}

/// Removes the document named by a delete event. Deleting an absent
/// document changes nothing.
pub struct DeleteDocumentHandler<D: SearchDocument> {
    kind: SearchKind,
    index: Arc<dyn SearchIndex<D>>,
    extract: ExtractId,
}

impl DeleteDocumentHandler<PostDocument> {
    pub fn posts(index: Arc<dyn SearchIndex<PostDocument>>) -> Self {
        Self {
            kind: SearchKind::PostDelete,
            index,
            extract: |m| Ok(m.decode::<PostEventPayload>()?.post_id),
        }
    }
}

impl DeleteDocumentHandler<CommentDocument> {
    pub fn comments(index: Arc<dyn SearchIndex<CommentDocument>>) -> Self {
        Self {
            kind: SearchKind::CommentDelete,
            index,
            extract: |m| Ok(m.decode::<CommentEventPayload>()?.comment_id),
        }
    }
}

#[async_trait]
impl<D: SearchDocument> EventHandler<SearchKind> for DeleteDocumentHandler<D> {
    fn kind(&self) -> SearchKind {
        self.kind
    }

    async fn handle(&self, message: &InboundMessage) -> AppResult<HandleOutcome> {
        let id = (self.extract)(message)?;
        if self.index.delete(id).await? {
            debug!(index = D::INDEX, id, "Document removed");
            Ok(HandleOutcome::Applied)
        } else {
            Ok(HandleOutcome::skipped("document not indexed"))
        }
    }
}
