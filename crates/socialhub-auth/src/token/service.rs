//! Token issue, validation, revocation and sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use socialhub_core::config::AuthConfig;
use socialhub_core::result::AppResult;
use socialhub_database::repositories::TokenRepository;
use socialhub_entity::token::{Token, TokenState};

use crate::jwt::{Claims, JwtDecoder, JwtEncoder};

use super::response::ValidationResponse;

/// SHA-256 of a raw token, hex encoded. Tokens are stored and looked up by this.
pub fn hash_token(raw: &str) -> String {
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}

/// A token just handed to a client.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub claims: Claims,
}

/// Owns the server-side token lifecycle.
#[derive(Clone)]
pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>, config: &AuthConfig) -> Self {
        Self {
            tokens,
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }

    /// Sign a token for the account and record it as issued.
    pub async fn issue(
        &self,
        user_id: i64,
        email: &str,
        roles: &[String],
        device_metadata: Option<serde_json::Value>,
    ) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let (raw, claims) = self.encoder.encode(user_id, email, roles, now)?;
        let expires_at = claims.expires_at();

        self.tokens
            .insert(&Token {
                id: claims.jti,
                token_hash: hash_token(&raw),
                user_id,
                issued_at: now,
                expires_at,
                revoked: false,
                device_metadata,
            })
            .await?;

        debug!(user_id, token_id = %claims.jti, "Issued access token");
        Ok(IssuedToken {
            access_token: raw,
            expires_at,
            claims,
        })
    }

    /// Validate a raw bearer token.
    ///
    /// Never fails: every rejection, including a store outage, comes back
    /// as an invalid response carrying the reason.
    pub async fn validate(&self, raw: &str) -> ValidationResponse {
        self.validate_at(raw, Utc::now()).await
    }

    pub(crate) async fn validate_at(&self, raw: &str, now: DateTime<Utc>) -> ValidationResponse {
        if raw.trim().is_empty() {
            return ValidationResponse::invalid("Missing token");
        }

        // Untrusted parse first so garbage never reaches the store.
        if let Err(e) = self.decoder.peek(raw) {
            return ValidationResponse::invalid(e.message);
        }

        let stored = match self.tokens.find_by_hash(&hash_token(raw)).await {
            Ok(Some(token)) => token,
            Ok(None) => return ValidationResponse::invalid("Token not found"),
            Err(e) => {
                return ValidationResponse::invalid(format!("Token lookup failed: {}", e.message));
            }
        };

        match stored.state_at(now) {
            TokenState::Revoked => return ValidationResponse::invalid("Token has been revoked"),
            TokenState::Expired => return ValidationResponse::invalid("Token has expired"),
            TokenState::Issued => {}
        }

        let claims = match self.decoder.verify(raw) {
            Ok(claims) => claims,
            Err(e) => return ValidationResponse::invalid(e.message),
        };

        match claims.user_id() {
            Some(user_id) if user_id == stored.user_id => {
                ValidationResponse::from_claims(claims, user_id)
            }
            _ => ValidationResponse::invalid("Token subject does not match"),
        }
    }

    /// Revoke one raw token. Returns `true` if this call revoked it.
    pub async fn revoke(&self, raw: &str) -> AppResult<bool> {
        let revoked = self.tokens.revoke(&hash_token(raw)).await?;
        if revoked {
            info!("Access token revoked");
        }
        Ok(revoked)
    }

    /// Revoke every live token of a user.
    pub async fn revoke_all(&self, user_id: i64) -> AppResult<u64> {
        let count = self.tokens.revoke_all_for_user(user_id).await?;
        info!(user_id, count, "Revoked all access tokens");
        Ok(count)
    }

    /// Delete tokens past their expiry.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        self.tokens.delete_expired(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use socialhub_database::memory::MemoryTokenRepository;

    fn service() -> TokenService {
        TokenService::new(Arc::new(MemoryTokenRepository::new()), &AuthConfig::default())
    }

    fn roles() -> Vec<String> {
        vec!["USER".to_string()]
    }

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("abc"));
        assert_ne!(hash, hash_token("abd"));
    }

    #[tokio::test]
    async fn test_issued_token_is_valid() {
        let svc = service();
        let issued = svc.issue(7, "a@example.com", &roles(), None).await.unwrap();
        let response = svc.validate(&issued.access_token).await;
        assert!(response.valid, "{}", response.message);
        assert_eq!(response.user_id, Some(7));
        assert_eq!(response.roles, roles());
    }

    #[tokio::test]
    async fn test_revoked_token_is_invalid_despite_good_signature() {
        let svc = service();
        let issued = svc.issue(7, "a@example.com", &roles(), None).await.unwrap();
        assert!(svc.revoke(&issued.access_token).await.unwrap());
        assert!(!svc.revoke(&issued.access_token).await.unwrap());

        let response = svc.validate(&issued.access_token).await;
        assert!(!response.valid);
        assert_eq!(response.message, "Token has been revoked");
    }

    #[tokio::test]
    async fn test_signed_but_unknown_token_is_invalid() {
        let svc = service();
        let (raw, _) = JwtEncoder::new(&AuthConfig::default())
            .encode(7, "a@example.com", &roles(), Utc::now())
            .unwrap();
        let response = svc.validate(&raw).await;
        assert!(!response.valid);
        assert_eq!(response.message, "Token not found");
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid() {
        let svc = service();
        let issued = svc.issue(7, "a@example.com", &roles(), None).await.unwrap();
        let later = issued.expires_at + Duration::seconds(1);
        let response = svc.validate_at(&issued.access_token, later).await;
        assert!(!response.valid);
        assert_eq!(response.message, "Token has expired");
    }

    #[tokio::test]
    async fn test_garbage_and_empty_tokens() {
        let svc = service();
        assert_eq!(svc.validate("").await.message, "Missing token");
        assert_eq!(svc.validate("a.b.c").await.message, "Malformed token");
    }

    #[tokio::test]
    async fn test_revoke_all_only_touches_one_user() {
        let svc = service();
        let a1 = svc.issue(1, "a@example.com", &roles(), None).await.unwrap();
        let a2 = svc.issue(1, "a@example.com", &roles(), None).await.unwrap();
        let b = svc.issue(2, "b@example.com", &roles(), None).await.unwrap();

        assert_eq!(svc.revoke_all(1).await.unwrap(), 2);
        assert!(!svc.validate(&a1.access_token).await.valid);
        assert!(!svc.validate(&a2.access_token).await.valid);
        assert!(svc.validate(&b.access_token).await.valid);
    }
}
