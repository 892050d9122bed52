//! Shared value types.

pub mod pagination;

pub use self::pagination::{PageRequest, PageResponse};
