//! Exchange of a provider access token for the provider's user-info document.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use socialhub_core::config::OAuthConfig;
use socialhub_core::error::{AppError, ErrorKind};

use super::OAuthProvider;

/// Message returned when the provider rejects the token or cannot be reached.
pub const PROVIDER_REJECTED: &str = "OAuth provider did not accept the access token";

/// Fetches user info from the provider with the caller's access token.
///
/// Identity attributes only ever come from the provider; the login request
/// carries nothing but the token.
#[derive(Debug, Clone)]
pub struct OAuthUserInfoClient {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl OAuthUserInfoClient {
    pub fn new(config: &OAuthConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.userinfo_timeout_ms))
            .user_agent("socialhub-auth")
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build OAuth client", e)
            })?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn userinfo_url(&self, provider: OAuthProvider) -> &str {
        match provider {
            OAuthProvider::Google => &self.config.google_userinfo_url,
            OAuthProvider::GitHub => &self.config.github_userinfo_url,
            OAuthProvider::Facebook => &self.config.facebook_userinfo_url,
        }
    }

    /// User-info document for the holder of `access_token`.
    pub async fn fetch(&self, provider: OAuthProvider, access_token: &str) -> Result<Value, AppError> {
        let url = self.userinfo_url(provider);
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!(%provider, error = %e, timeout = e.is_timeout(), "User-info request failed");
                AppError::authentication(PROVIDER_REJECTED)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%provider, status = %status, "User-info request returned an error status");
            return Err(AppError::authentication(PROVIDER_REJECTED));
        }

        let document = response.json::<Value>().await.map_err(|e| {
            warn!(%provider, error = %e, "Unreadable user-info response");
            AppError::authentication(PROVIDER_REJECTED)
        })?;
        debug!(%provider, "Fetched provider user info");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base: &str, timeout_ms: u64) -> OAuthUserInfoClient {
        OAuthUserInfoClient::new(&OAuthConfig {
            google_userinfo_url: format!("{base}/userinfo"),
            userinfo_timeout_ms: timeout_ms,
            ..OAuthConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_token() {
        let router = Router::new().route(
            "/userinfo",
            get(|headers: HeaderMap| async move {
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Bearer ya29.good") => {
                        Ok(Json(json!({"sub": "g-1", "email": "g@example.com"})))
                    }
                    _ => Err(StatusCode::UNAUTHORIZED),
                }
            }),
        );
        let client = client(&serve(router).await, 2000);

        let document = client.fetch(OAuthProvider::Google, "ya29.good").await.unwrap();
        assert_eq!(document["sub"], "g-1");

        let err = client.fetch(OAuthProvider::Google, "forged").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, PROVIDER_REJECTED);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_rejected() {
        let client = client("http://127.0.0.1:1", 200);
        let err = client.fetch(OAuthProvider::Google, "any").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_urls_per_provider() {
        let client = OAuthUserInfoClient::new(&OAuthConfig::default()).unwrap();
        assert_eq!(
            client.userinfo_url(OAuthProvider::GitHub),
            "https://api.github.com/user"
        );
    }
}
