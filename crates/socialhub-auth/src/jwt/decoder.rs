//! JWT parsing and verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;

use super::claims::Claims;

/// Verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
    untrusted: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);

        let mut untrusted = Validation::new(Algorithm::HS256);
        untrusted.insecure_disable_signature_validation();
        untrusted.validate_exp = false;
        untrusted.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            untrusted,
        }
    }

    /// Read the claims without checking signature or expiry.
    ///
    /// Only for routing and logging; nothing read here is trusted.
    pub fn peek(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.untrusted)
            .map(|data| data.claims)
            .map_err(|_| AppError::authentication("Malformed token"))
    }

    /// Verify signature, issuer and expiry, returning the trusted claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::authentication("Token has expired"),
                JwtErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                JwtErrorKind::InvalidIssuer => AppError::authentication("Invalid token issuer"),
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            })
    }
}
