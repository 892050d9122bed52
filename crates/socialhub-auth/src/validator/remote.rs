//! Validation by calling the auth service's validation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use socialhub_core::config::GatewayConfig;
use socialhub_core::error::{AppError, ErrorKind};

use crate::token::ValidationResponse;

use super::TokenValidator;

/// Message returned when the auth service cannot answer in time.
pub const AUTH_UNAVAILABLE: &str = "Authentication service unavailable";

/// Validator used by the gateway and by services other than auth.
///
/// The request is bounded by `gateway.validation_timeout_ms`; a timeout,
/// connection error, non-2xx status or unreadable body all count as invalid.
#[derive(Debug, Clone)]
pub struct RemoteTokenValidator {
    client: reqwest::Client,
    url: String,
}

impl RemoteTokenValidator {
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.validation_timeout_ms))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build validation client", e)
            })?;
        Ok(Self {
            client,
            url: config.validation_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenValidator for RemoteTokenValidator {
    async fn validate(&self, token: &str) -> ValidationResponse {
        let response = match self.client.get(&self.url).bearer_auth(token).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %self.url, error = %e, timeout = e.is_timeout(), "Token validation request failed");
                return ValidationResponse::invalid(AUTH_UNAVAILABLE);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = %status, "Token validation returned an error status");
            return ValidationResponse::invalid(AUTH_UNAVAILABLE);
        }

        match response.json::<ValidationResponse>().await {
            Ok(body) => {
                debug!(valid = body.valid, "Remote token validation answered");
                body
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Unreadable token validation response");
                ValidationResponse::invalid(AUTH_UNAVAILABLE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn gateway(base: String, timeout_ms: u64) -> GatewayConfig {
        GatewayConfig {
            auth_service_url: base,
            validation_timeout_ms: timeout_ms,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_forwards_bearer_and_returns_body() {
        let router = Router::new().route(
            "/api/auth/validate",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if auth == "Bearer good" {
                    Json(ValidationResponse::valid(7, "a@example.com", vec!["USER".into()]))
                } else {
                    Json(ValidationResponse::invalid("Token not found"))
                }
            }),
        );
        let validator = RemoteTokenValidator::new(&gateway(serve(router).await, 2000)).unwrap();

        let ok = validator.validate("good").await;
        assert!(ok.valid);
        assert_eq!(ok.user_id, Some(7));

        let bad = validator.validate("bad").await;
        assert!(!bad.valid);
        assert_eq!(bad.message, "Token not found");
    }

    #[tokio::test]
    async fn test_timeout_fails_closed() {
        let router = Router::new().route(
            "/api/auth/validate",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(ValidationResponse::valid(7, "a@example.com", vec![]))
            }),
        );
        let validator = RemoteTokenValidator::new(&gateway(serve(router).await, 50)).unwrap();
        let response = validator.validate("good").await;
        assert!(!response.valid);
        assert_eq!(response.message, AUTH_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unreachable_fails_closed() {
        let validator =
            RemoteTokenValidator::new(&gateway("http://127.0.0.1:1".to_string(), 200)).unwrap();
        assert!(!validator.validate("good").await.valid);
    }
}
