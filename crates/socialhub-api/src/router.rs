//! Route definitions for the SocialHub HTTP API.
//!
//! Public routes are mounted as-is. Routes owned by the auth and social
//! side sit behind the gateway filter; notification routes use the
//! per-service filter. The internal friend lookup is unauthenticated and
//! mounted outside `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let gateway_routes = Router::new()
        .merge(session_routes())
        .merge(user_routes())
        .merge(friendship_routes())
        .merge(like_routes())
        .merge(presence_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::gateway_filter,
        ));

    let service_routes = notification_routes().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::service_filter,
    ));

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(search_routes())
        .merge(health_routes())
        .merge(gateway_routes)
        .merge(service_routes);

    Router::new()
        .nest("/api", api_routes)
        .merge(internal_routes())
        .with_state(state)
}

/// Unauthenticated auth endpoints, including token validation
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/validate", get(handlers::auth::validate))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/oauth/{provider}", post(handlers::auth::oauth_login))
        .route("/auth/otp/send", post(handlers::auth::send_otp))
        .route("/auth/otp/verify", post(handlers::auth::verify_otp))
        .route("/auth/password/reset", post(handlers::auth::reset_password))
}

/// Authenticated token and password management
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/auth/password", put(handlers::auth::change_password))
}

fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/me",
        get(handlers::user::me).put(handlers::user::update_me),
    )
}

fn friendship_routes() -> Router<AppState> {
    Router::new()
        .route("/friendships", post(handlers::friendship::send_request))
        .route(
            "/friendships/friend-ids",
            get(handlers::friendship::my_friend_ids),
        )
        .route("/friendships/{id}/accept", put(handlers::friendship::accept))
        .route("/friendships/{id}/decline", put(handlers::friendship::decline))
}

fn like_routes() -> Router<AppState> {
    Router::new().route(
        "/posts/{post_id}/likes",
        post(handlers::like::like).delete(handlers::like::unlike),
    )
}

fn presence_routes() -> Router<AppState> {
    Router::new()
        .route("/presence/sessions", post(handlers::presence::connect))
        .route(
            "/presence/sessions/{session_id}",
            delete(handlers::presence::disconnect),
        )
        .route("/presence/online", get(handlers::presence::online_users))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}",
            get(handlers::notification::get_notification)
                .delete(handlers::notification::delete_notification),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}/unread",
            put(handlers::notification::mark_unread),
        )
}

fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search/posts", get(handlers::search::posts))
        .route("/search/comments", get(handlers::search::comments))
        .route("/search/users", get(handlers::search::users))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn internal_routes() -> Router<AppState> {
    Router::new().route(
        "/internal/friendships/{user_id}/friend-ids",
        get(handlers::internal::friend_ids),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use socialhub_core::config::AppConfig;
    use socialhub_database::Stores;
    use socialhub_messaging::{DomainEventPublisher, MemoryBroker};

    use super::*;

    fn app() -> Router {
        let broker = Arc::new(MemoryBroker::new(1, 64));
        let (publisher, _task) = DomainEventPublisher::spawn(broker, 64);
        let state = AppState::new(AppConfig::default(), Stores::in_memory(), publisher).unwrap();
        build_router(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn register(app: &Router) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/auth/register",
                json!({
                    "email": "ada@example.com",
                    "password": "correct horse",
                    "firstName": "Ada",
                    "lastName": "Lovelace"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["accessToken"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get("/api/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_validate_without_token_is_200_invalid() {
        let (status, body) = send(&app(), get("/api/auth/validate", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["message"], "Missing token");
    }

    #[tokio::test]
    async fn test_gateway_rejects_missing_token() {
        let (status, body) = send(&app(), get("/api/users/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing token");
    }

    #[tokio::test]
    async fn test_spoofed_identity_headers_are_ignored() {
        let request = Request::builder()
            .uri("/api/notifications/unread-count")
            .header("x-user-id", "1")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_registered_token_reaches_both_filter_shapes() {
        let app = app();
        let token = register(&app).await;

        let (status, body) = send(&app, get("/api/users/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ada@example.com");

        let (status, body) = send(&app, get("/api/notifications/unread-count", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);

        let (_, body) = send(&app, get("/api/auth/validate", Some(&token))).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["roles"], json!(["USER"]));
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let app = app();
        let token = register(&app).await;

        let logout = Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, logout).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, get("/api/users/me", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Token has been revoked");
    }

    #[tokio::test]
    async fn test_internal_friend_lookup_without_friends() {
        let (status, body) = send(&app(), get("/internal/friendships/5/friend-ids", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
