//! Index document types.

use serde::{Deserialize, Serialize};

use socialhub_core::events::{CommentSnapshot, PostSnapshot, UserEventPayload};

use super::filter::SearchFilter;

/// Behaviour shared by every indexed document.
pub trait SearchDocument: Clone + Send + Sync + 'static {
    /// Name of the index holding this document type.
    const INDEX: &'static str;

    /// Key of the document inside its index.
    fn id(&self) -> i64;

    /// Monotonic version used for last-write-wins.
    fn version(&self) -> i64;

    /// Whether the document satisfies a query filter.
    fn matches(&self, filter: &SearchFilter) -> bool;
}

/// Indexed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub id: i64,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl From<&PostSnapshot> for PostDocument {
    fn from(post: &PostSnapshot) -> Self {
        Self {
            id: post.id,
            content: post.content.clone(),
            author_id: post.author.user_id,
            author_name: post.author.display_name(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl SearchDocument for PostDocument {
    const INDEX: &'static str = "posts";

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }

    fn matches(&self, filter: &SearchFilter) -> bool {
        filter.matches_author(self.author_id) && filter.matches_text(&self.content)
    }
}

/// Indexed comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDocument {
    pub id: i64,
    pub content: String,
    pub post_id: Option<i64>,
    pub parent_comment_id: Option<i64>,
    pub author_id: i64,
    pub author_name: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl From<&CommentSnapshot> for CommentDocument {
    fn from(comment: &CommentSnapshot) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            post_id: comment.post_id,
            parent_comment_id: comment.parent_comment_id,
            author_id: comment.author.user_id,
            author_name: comment.author.display_name(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl SearchDocument for CommentDocument {
    const INDEX: &'static str = "comments";

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }

    fn matches(&self, filter: &SearchFilter) -> bool {
        filter.matches_author(self.author_id) && filter.matches_text(&self.content)
    }
}

/// Indexed user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    /// Epoch milliseconds of the last replicated change.
    pub updated_at: i64,
}

impl From<&UserEventPayload> for UserDocument {
    fn from(user: &UserEventPayload) -> Self {
        Self {
            user_id: user.user_id,
            full_name: user.display_name(),
            email: user.email.clone(),
            updated_at: user.version().timestamp_millis(),
        }
    }
}

impl SearchDocument for UserDocument {
    const INDEX: &'static str = "users";

    fn id(&self) -> i64 {
        self.user_id
    }

    fn version(&self) -> i64 {
        self.updated_at
    }

    fn matches(&self, filter: &SearchFilter) -> bool {
        filter.matches_author(self.user_id)
            && (filter.matches_text(&self.full_name) || filter.matches_text(&self.email))
    }
}
