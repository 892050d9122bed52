//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;

use socialhub_api::{AppState, build_app};
use socialhub_consumer::{StoreFriendDirectory, notification, search_sync, user_sync};
use socialhub_core::config::AppConfig;
use socialhub_database::Stores;
use socialhub_messaging::consumer::ConsumerStats;
use socialhub_messaging::{DomainEventPublisher, EventConsumer, MemoryBroker, MessageBroker};

/// Test application context: the HTTP app plus running consumers.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    pub state: AppState,
    pub stores: Stores,
    pub broker: Arc<MemoryBroker>,
    pub user_sync: Arc<ConsumerStats>,
    pub search_sync: Arc<ConsumerStats>,
    pub notifications: Arc<ConsumerStats>,
    shutdown: watch::Sender<bool>,
}

/// Simplified response for assertions
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let stores = Stores::in_memory();
        let broker = Arc::new(MemoryBroker::new(2, 256));
        let (publisher, _task) = DomainEventPublisher::spawn(broker.clone(), 256);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let user_consumer = Arc::new(EventConsumer::new(
            user_sync::registry(stores.profiles.clone()).expect("user sync registry"),
        ));
        let search_consumer = Arc::new(EventConsumer::new(
            search_sync::registry(&stores).expect("search sync registry"),
        ));
        let notification_consumer = Arc::new(EventConsumer::new(
            notification::registry(
                stores.notifications.clone(),
                Arc::new(StoreFriendDirectory::new(stores.friendships.clone())),
            )
            .expect("notification registry"),
        ));

        let stats = (
            user_consumer.stats(),
            search_consumer.stats(),
            notification_consumer.stats(),
        );

        user_consumer
            .spawn(broker.as_ref(), &user_sync::TOPICS, "test-user-sync", shutdown_rx.clone())
            .await
            .expect("spawn user sync");
        search_consumer
            .spawn(broker.as_ref(), &search_sync::TOPICS, "test-search-sync", shutdown_rx.clone())
            .await
            .expect("spawn search sync");
        notification_consumer
            .spawn(broker.as_ref(), &notification::TOPICS, "test-notification", shutdown_rx)
            .await
            .expect("spawn notification");

        let state =
            AppState::new(config, stores.clone(), publisher).expect("Failed to build state");

        Self {
            router: build_app(state.clone()),
            state,
            stores,
            broker,
            user_sync: stats.0,
            search_sync: stats.1,
            notifications: stats.2,
            shutdown,
        }
    }

    /// Make a request to the test app
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Register an account and return `(user_id, access_token)`
    pub async fn register(&self, email: &str, first_name: &str) -> (i64, String) {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "email": email,
                    "password": "password123",
                    "firstName": first_name,
                    "lastName": "Tester",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        let user_id = response.body["user"]["id"].as_i64().expect("user id");
        let token = response.body["accessToken"]
            .as_str()
            .expect("access token")
            .to_string();
        (user_id, token)
    }

    /// Put raw bytes on a topic, as a producer or a redelivery would
    pub async fn publish_raw(&self, topic: &str, key: &str, payload: &Value) {
        self.broker
            .publish(topic, key, serde_json::to_vec(payload).expect("payload"))
            .await
            .expect("publish");
    }

    /// Serve the app on an ephemeral port
    pub async fn serve(&self) -> SocketAddr {
        serve(self.router.clone()).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// Serve a router on an ephemeral port
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Poll until `check` holds or a few seconds pass
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Wait until a consumer has processed at least `count` messages
pub async fn processed(stats: &ConsumerStats, count: u64) {
    assert!(
        eventually(move || async move { stats.processed() >= count }).await,
        "consumer processed {} of {count} messages",
        stats.processed()
    );
}
