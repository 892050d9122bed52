//! `post-events` and `comment-events` payloads.
//!
//! Timestamps on snapshots are epoch seconds. Producers may leave out the
//! snapshot's own `id` and `createdAt`; the id then comes from the event and
//! a missing `createdAt` reads as 0, the oldest possible version.

use serde::{Deserialize, Serialize};

use super::action::ActionType;

/// Author block embedded in content snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAuthor {
    pub user_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl ContentAuthor {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Post state at the time of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSnapshot {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
    pub author: ContentAuthor,
}

impl PostSnapshot {
    /// Timestamp used for last-write-wins comparisons.
    pub fn version(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Document published on `post-events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEventPayload {
    #[serde(alias = "eventType")]
    pub action_type: ActionType,
    pub post_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostSnapshot>,
}

impl PostEventPayload {
    /// Snapshot keyed by the event's `postId`.
    pub fn snapshot(&self) -> Option<PostSnapshot> {
        self.post.clone().map(|post| PostSnapshot {
            id: self.post_id,
            ..post
        })
    }
}

/// Comment state at the time of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnapshot {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
    pub author: ContentAuthor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<i64>,
}

impl CommentSnapshot {
    /// Timestamp used for last-write-wins comparisons.
    pub fn version(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Document published on `comment-events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEventPayload {
    #[serde(alias = "eventType")]
    pub action_type: ActionType,
    pub comment_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentSnapshot>,
}

impl CommentEventPayload {
    /// Snapshot keyed by the event's `commentId`.
    pub fn snapshot(&self) -> Option<CommentSnapshot> {
        self.comment.clone().map(|comment| CommentSnapshot {
            id: self.comment_id,
            ..comment
        })
    }
}
