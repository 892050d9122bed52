//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;

use super::claims::Claims;

/// Creates signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: String,
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Sign a token for the account. Returns the raw token and its claims.
    pub fn encode(
        &self,
        user_id: i64,
        email: &str,
        roles: &[String],
        now: DateTime<Utc>,
    ) -> Result<(String, Claims), AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;
        Ok((token, claims))
    }
}
