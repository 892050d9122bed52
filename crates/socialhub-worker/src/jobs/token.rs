//! Expired token sweep.

use async_trait::async_trait;

use socialhub_auth::TokenService;
use socialhub_core::result::AppResult;

use super::SweepJob;

#[derive(Debug, Clone)]
pub struct TokenSweepJob {
    tokens: TokenService,
    schedule: String,
}

impl TokenSweepJob {
    pub fn new(tokens: TokenService, schedule: impl Into<String>) -> Self {
        Self {
            tokens,
            schedule: schedule.into(),
        }
    }
}

#[async_trait]
impl SweepJob for TokenSweepJob {
    fn name(&self) -> &'static str {
        "token_cleanup"
    }

    fn schedule(&self) -> &str {
        &self.schedule
    }

    async fn run_once(&self) -> AppResult<u64> {
        self.tokens.sweep_expired().await
    }
}
