//! Access token entities.

pub mod model;

pub use model::{Token, TokenState};
