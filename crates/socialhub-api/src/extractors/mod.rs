//! Custom Axum extractors.

pub mod identity;
pub mod pagination;

pub use identity::Identity;
pub use pagination::PaginationParams;
