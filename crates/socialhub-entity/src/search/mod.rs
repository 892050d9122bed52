//! Search projection documents.
//!
//! Documents are eventually consistent copies keyed by entity id and are
//! only ever changed in response to events.

pub mod document;
pub mod filter;

pub use document::{CommentDocument, PostDocument, SearchDocument, UserDocument};
pub use filter::SearchFilter;
