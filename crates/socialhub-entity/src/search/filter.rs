//! Search query filter.

use serde::{Deserialize, Serialize};

use socialhub_core::types::PageRequest;

/// Filter applied by `query(index, filter)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Restrict to documents written by (or describing) this user.
    pub author_id: Option<i64>,
    /// Case-insensitive substring the document text must contain.
    pub text: Option<String>,
    /// Page to return.
    #[serde(default)]
    pub page: PageRequest,
}

impl SearchFilter {
    pub fn matches_author(&self, author_id: i64) -> bool {
        self.author_id.is_none_or(|wanted| wanted == author_id)
    }

    pub fn matches_text(&self, haystack: &str) -> bool {
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}
