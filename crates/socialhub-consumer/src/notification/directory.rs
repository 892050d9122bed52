//! Friend list resolution for fan-out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use socialhub_core::config::NotificationConfig;
use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_database::repositories::FriendshipRepository;

/// Answers "who are this user's friends?".
#[async_trait]
pub trait FriendDirectory: Send + Sync {
    async fn friend_ids(&self, user_id: i64) -> AppResult<Vec<i64>>;
}

/// Calls the friendship service's internal endpoint with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpFriendDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFriendDirectory {
    pub fn new(config: &NotificationConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.friend_lookup_timeout_ms))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build friend lookup client", e)
            })?;
        Ok(Self {
            client,
            base_url: config.friend_service_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, user_id: i64) -> String {
        format!("{}/internal/friendships/{user_id}/friend-ids", self.base_url)
    }
}

#[async_trait]
impl FriendDirectory for HttpFriendDirectory {
    async fn friend_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        let url = self.url(user_id);
        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, format!("Friend lookup failed: {url}"), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Friend lookup returned {status}"
            )));
        }

        let ids: Vec<i64> = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Unreadable friend lookup response", e)
        })?;
        debug!(user_id, friends = ids.len(), "Resolved friends over HTTP");
        Ok(ids)
    }
}

/// Reads the friendship store directly, for single-process deployments.
#[derive(Clone)]
pub struct StoreFriendDirectory {
    friendships: Arc<dyn FriendshipRepository>,
}

impl StoreFriendDirectory {
    pub fn new(friendships: Arc<dyn FriendshipRepository>) -> Self {
        Self { friendships }
    }
}

#[async_trait]
impl FriendDirectory for StoreFriendDirectory {
    async fn friend_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        self.friendships.friend_ids(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
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

    fn config(base: String, timeout_ms: u64) -> NotificationConfig {
        NotificationConfig {
            friend_service_url: base,
            friend_lookup_timeout_ms: timeout_ms,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_http_lookup() {
        let router = Router::new().route(
            "/internal/friendships/{id}/friend-ids",
            get(|Path(id): Path<i64>| async move { Json(vec![id + 1, id + 2]) }),
        );
        let directory = HttpFriendDirectory::new(&config(serve(router).await, 1000)).unwrap();
        assert_eq!(directory.friend_ids(10).await.unwrap(), vec![11, 12]);
    }

    #[tokio::test]
    async fn test_http_timeout_is_transient_error() {
        let router = Router::new().route(
            "/internal/friendships/{id}/friend-ids",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(Vec::<i64>::new())
            }),
        );
        let directory = HttpFriendDirectory::new(&config(serve(router).await, 50)).unwrap();
        let err = directory.friend_ids(1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
