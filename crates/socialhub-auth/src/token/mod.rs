//! Server-side token lifecycle and the validation contract.

pub mod response;
pub mod service;

pub use response::ValidationResponse;
pub use service::{IssuedToken, TokenService, hash_token};
