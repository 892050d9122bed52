//! The token validation contract shared by the gateway and per-service filters.

pub mod local;
pub mod remote;

use async_trait::async_trait;

use crate::token::ValidationResponse;

pub use local::LocalTokenValidator;
pub use remote::RemoteTokenValidator;

/// Answers "is this bearer token good, and for whom?".
///
/// Implementations never error: an unreachable or misbehaving authority
/// yields an invalid response, so callers always fail closed.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> ValidationResponse;
}
