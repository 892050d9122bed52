//! In-process validation against the token service.

use async_trait::async_trait;

use crate::token::{TokenService, ValidationResponse};

use super::TokenValidator;

/// Validator used inside the auth service itself.
#[derive(Debug, Clone)]
pub struct LocalTokenValidator {
    tokens: TokenService,
}

impl LocalTokenValidator {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl TokenValidator for LocalTokenValidator {
    async fn validate(&self, token: &str) -> ValidationResponse {
        self.tokens.validate(token).await
    }
}
