//! In-memory token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use socialhub_core::result::AppResult;
use socialhub_entity::token::Token;

use crate::repositories::TokenRepository;

#[derive(Debug, Default)]
pub struct MemoryTokenRepository {
    tokens: DashMap<String, Token>,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn insert(&self, token: &Token) -> AppResult<()> {
        self.tokens.insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<Token>> {
        Ok(self.tokens.get(token_hash).map(|t| t.clone()))
    }

    async fn revoke(&self, token_hash: &str) -> AppResult<bool> {
        Ok(match self.tokens.get_mut(token_hash) {
            Some(mut token) if !token.revoked => {
                token.revoked = true;
                true
            }
            _ => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> AppResult<u64> {
        let mut revoked = 0;
        for mut token in self.tokens.iter_mut() {
            if token.user_id == user_id && !token.revoked {
                token.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut deleted = 0;
        self.tokens.retain(|_, token| {
            let keep = token.expires_at >= now;
            if !keep {
                deleted += 1;
            }
            keep
        });
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn token(hash: &str, user_id: i64, expires_in: Duration) -> Token {
        let now = Utc::now();
        Token {
            id: Uuid::new_v4(),
            token_hash: hash.to_string(),
            user_id,
            issued_at: now,
            expires_at: now + expires_in,
            revoked: false,
            device_metadata: None,
        }
    }

    #[tokio::test]
    async fn test_revoke_is_conditional() {
        let repo = MemoryTokenRepository::new();
        repo.insert(&token("a", 1, Duration::hours(1))).await.unwrap();

        assert!(repo.revoke("a").await.unwrap());
        assert!(!repo.revoke("a").await.unwrap());
        assert!(!repo.revoke("missing").await.unwrap());
        assert!(repo.find_by_hash("a").await.unwrap().unwrap().revoked);
    }

    #[tokio::test]
    async fn test_revoke_all_only_touches_owner() {
        let repo = MemoryTokenRepository::new();
        repo.insert(&token("a", 1, Duration::hours(1))).await.unwrap();
        repo.insert(&token("b", 1, Duration::hours(1))).await.unwrap();
        repo.insert(&token("c", 2, Duration::hours(1))).await.unwrap();

        assert_eq!(repo.revoke_all_for_user(1).await.unwrap(), 2);
        assert!(!repo.find_by_hash("c").await.unwrap().unwrap().revoked);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let repo = MemoryTokenRepository::new();
        repo.insert(&token("old", 1, Duration::hours(-2))).await.unwrap();
        repo.insert(&token("new", 1, Duration::hours(2))).await.unwrap();

        assert_eq!(repo.delete_expired(Utc::now()).await.unwrap(), 1);
        assert_eq!(repo.delete_expired(Utc::now()).await.unwrap(), 0);
        assert!(repo.find_by_hash("new").await.unwrap().is_some());
    }
}
