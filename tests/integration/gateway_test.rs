//! Integration tests for token validation and the gateway filters.

mod helpers;

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router, middleware as axum_middleware};
use serde_json::{Value, json};

use socialhub_api::middleware::gateway_filter;
use socialhub_core::config::AppConfig;

fn remote_config(auth_url: &str, timeout_ms: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.gateway.local_validation = false;
    config.gateway.auth_service_url = auth_url.to_string();
    config.gateway.validation_timeout_ms = timeout_ms;
    config
}

#[tokio::test]
async fn test_revoked_token_is_invalid() {
    let app = helpers::TestApp::new().await;
    let (_, token) = app.register("ada@example.com", "Ada").await;

    let response = app.request("POST", "/api/auth/logout", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/auth/validate", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["valid"], false);
    assert_eq!(response.body["message"], "Token has been revoked");
    assert!(response.body.get("userId").is_none());

    let response = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Token has been revoked");
}

#[tokio::test]
async fn test_logout_all_revokes_every_token() {
    let app = helpers::TestApp::new().await;
    let (_, first) = app.register("ada@example.com", "Ada").await;
    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "ada@example.com", "password": "password123"})),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let second = login.body["accessToken"].as_str().unwrap().to_string();

    let response = app.request("POST", "/api/auth/logout-all", None, Some(&second)).await;
    assert_eq!(response.body["count"], 2);

    for token in [&first, &second] {
        let response = app.request("GET", "/api/auth/validate", None, Some(token)).await;
        assert_eq!(response.body["valid"], false);
    }
}

#[tokio::test]
async fn test_validation_timeout_fails_closed() {
    let slow_auth = Router::new().route(
        "/api/auth/validate",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({"valid": true, "userId": 1, "email": "a@b.c", "roles": ["USER"], "message": "Token is valid"}))
        }),
    );
    let auth_addr = helpers::serve(slow_auth).await;

    let gateway = helpers::TestApp::with_config(remote_config(&format!("http://{auth_addr}"), 100)).await;
    let response = gateway
        .request("GET", "/api/notifications/unread-count", None, Some("any.token.value"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Authentication service unavailable");
}

#[tokio::test]
async fn test_unreachable_auth_service_fails_closed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = helpers::TestApp::with_config(remote_config(&format!("http://{addr}"), 500)).await;
    let response = gateway
        .request("GET", "/api/friendships/friend-ids", None, Some("any.token.value"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_remote_validation_relays_auth_service_answer() {
    let auth = helpers::TestApp::new().await;
    let auth_addr = auth.serve().await;
    let (_, token) = auth.register("ada@example.com", "Ada").await;

    let gateway = helpers::TestApp::with_config(remote_config(&format!("http://{auth_addr}"), 2000)).await;

    let response = gateway
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 0);

    auth.request("POST", "/api/auth/logout", None, Some(&token)).await;

    let response = gateway
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Token has been revoked");
}

#[tokio::test]
async fn test_gateway_replaces_spoofed_identity_headers() {
    let app = helpers::TestApp::new().await;
    let (user_id, token) = app.register("ada@example.com", "Ada").await;

    async fn echo(headers: HeaderMap) -> Json<Value> {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        Json(json!({
            "id": read("x-user-id"),
            "email": read("x-user-email"),
            "roles": read("x-user-roles"),
        }))
    }

    let downstream = Router::new()
        .route("/echo", get(echo))
        .layer(axum_middleware::from_fn_with_state(
            app.state.clone(),
            gateway_filter,
        ));
    let addr = helpers::serve(downstream).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/echo"))
        .bearer_auth(&token)
        .header("x-user-id", "999")
        .header("x-user-roles", "ADMIN")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["roles"], "USER");

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/echo"))
        .header("x-user-id", "999")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing token");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request("GET", "/api/auth/validate", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.body["valid"], false);
    assert_eq!(response.body["message"], "Malformed token");

    let response = app
        .request("GET", "/api/notifications", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Malformed token");
}

/// Google stand-in that knows one access token.
async fn google_userinfo() -> AppConfig {
    let router = Router::new().route(
        "/userinfo",
        get(|headers: HeaderMap| async move {
            match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                Some("Bearer ya29.grace") => Ok(Json(json!({
                    "sub": "g-100",
                    "email": "grace@example.com",
                    "given_name": "Grace",
                    "family_name": "Hopper"
                }))),
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }),
    );
    let addr = helpers::serve(router).await;
    let mut config = AppConfig::default();
    config.auth.oauth.google_userinfo_url = format!("http://{addr}/userinfo");
    config
}

#[tokio::test]
async fn test_oauth_login_ignores_client_supplied_identity() {
    let app = helpers::TestApp::with_config(google_userinfo().await).await;
    let (victim_id, _) = app.register("victim@example.com", "Victim").await;

    let forged = app
        .request(
            "POST",
            "/api/auth/oauth/google",
            Some(json!({"email": "victim@example.com", "sub": "attacker"})),
            None,
        )
        .await;
    assert!(forged.status.is_client_error(), "{}", forged.body);
    assert!(forged.body.get("accessToken").is_none());

    let bad_token = app
        .request(
            "POST",
            "/api/auth/oauth/google",
            Some(json!({"accessToken": "forged"})),
            None,
        )
        .await;
    assert_eq!(bad_token.status, StatusCode::UNAUTHORIZED);
    assert!(bad_token.body.get("accessToken").is_none());

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"email": "victim@example.com", "password": "password123"})),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["user"]["id"], victim_id);
    assert!(login.body["user"]["provider"].is_null());
}

#[tokio::test]
async fn test_oauth_login_with_provider_token() {
    let app = helpers::TestApp::with_config(google_userinfo().await).await;

    let first = app
        .request(
            "POST",
            "/api/auth/oauth/google",
            Some(json!({"accessToken": "ya29.grace"})),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.body["user"]["email"], "grace@example.com");
    assert!(first.body["accessToken"].is_string());

    let second = app
        .request(
            "POST",
            "/api/auth/oauth/google",
            Some(json!({"accessToken": "ya29.grace"})),
            None,
        )
        .await;
    assert_eq!(second.body["user"]["id"], first.body["user"]["id"]);
}

#[tokio::test]
async fn test_oauth_login_does_not_enter_password_account() {
    let app = helpers::TestApp::with_config(google_userinfo().await).await;
    app.register("grace@example.com", "Grace").await;

    let response = app
        .request(
            "POST",
            "/api/auth/oauth/google",
            Some(json!({"accessToken": "ya29.grace"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.get("accessToken").is_none());
}

async fn connect_session(app: &helpers::TestApp, token: &str) -> helpers::TestResponse {
    app.request(
        "POST",
        "/api/presence/sessions",
        Some(json!({"sessionId": "tab-1"})),
        Some(token),
    )
    .await
}

#[tokio::test]
async fn test_presence_session_belongs_to_first_claimant() {
    let app = helpers::TestApp::new().await;
    let (ada_id, ada) = app.register("ada@example.com", "Ada").await;
    let (_, bob) = app.register("bob@example.com", "Bob").await;

    let first = connect_session(&app, &ada).await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.body, json!({"type": "USER_ONLINE", "userId": ada_id}));

    let stolen = connect_session(&app, &bob).await;
    assert_eq!(stolen.status, StatusCode::CONFLICT);

    let foreign = app
        .request("DELETE", "/api/presence/sessions/tab-1", None, Some(&bob))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let own = app
        .request("DELETE", "/api/presence/sessions/tab-1", None, Some(&ada))
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body, json!({"type": "USER_OFFLINE", "userId": ada_id}));
}
