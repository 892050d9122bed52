//! Integration tests for event propagation: producers, broker and the
//! idempotent projections behind it.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use socialhub_entity::otp::OtpType;

fn post_event(action: &str, post_id: i64, content: &str, updated_at: Option<i64>) -> Value {
    json!({
        "actionType": action,
        "postId": post_id,
        "post": {
            "id": post_id,
            "content": content,
            "createdAt": 1_700_000_000,
            "updatedAt": updated_at,
            "author": {"userId": 1, "firstName": "Ada", "lastName": "Lovelace"}
        }
    })
}

fn user_created(user_id: i64, first_name: &str) -> Value {
    json!({
        "userId": user_id,
        "firstName": first_name,
        "lastName": "Hopper",
        "email": format!("user{user_id}@example.com"),
        "createdAt": "2024-03-01T10:00:00Z",
        "eventType": "USER_CREATED"
    })
}

#[tokio::test]
async fn test_create_update_delete_with_redelivery_leaves_post_absent() {
    let app = helpers::TestApp::new().await;

    let create = post_event("CREATE", 7, "first draft", None);
    let update = post_event("UPDATE", 7, "second draft", Some(1_700_000_100));
    let delete = json!({"actionType": "DELETE", "postId": 7});

    for event in [&create, &update, &delete, &create, &update, &delete] {
        app.publish_raw("post-events", "7", event).await;
    }
    helpers::processed(&app.search_sync, 6).await;

    let response = app.request("GET", "/api/search/posts", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 0);
    assert!(app.stores.post_index.get(7).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_for_absent_post_is_noop() {
    let app = helpers::TestApp::new().await;

    app.publish_raw("post-events", "99", &json!({"actionType": "DELETE", "postId": 99}))
        .await;
    app.publish_raw("post-events", "98", &post_event("CREATE", 98, "still here", None))
        .await;
    helpers::processed(&app.search_sync, 2).await;

    assert_eq!(app.stores.post_index.count().await.unwrap(), 1);
    assert_eq!(app.search_sync.failed(), 0);
}

#[tokio::test]
async fn test_post_created_replay_does_not_duplicate_or_regress() {
    let app = helpers::TestApp::new().await;

    app.publish_raw("post-events", "42", &post_event("CREATE", 42, "edited", Some(1_700_000_500)))
        .await;
    app.publish_raw("post-events", "42", &post_event("CREATE", 42, "original", Some(1_700_000_100)))
        .await;
    app.publish_raw("post-events", "42", &post_event("CREATE", 42, "edited", Some(1_700_000_500)))
        .await;
    helpers::processed(&app.search_sync, 3).await;

    let response = app
        .request("GET", "/api/search/posts?authorId=1", None, None)
        .await;
    assert_eq!(response.body["total_items"], 1);
    assert_eq!(response.body["items"][0]["id"], 42);
    assert_eq!(response.body["items"][0]["content"], "edited");
}

#[tokio::test]
async fn test_duplicate_user_created_yields_one_profile() {
    let app = helpers::TestApp::new().await;

    app.publish_raw("user-events", "9", &user_created(9, "Grace")).await;
    app.publish_raw("user-events", "9", &user_created(9, "Impostor")).await;
    helpers::processed(&app.user_sync, 2).await;

    assert_eq!(app.stores.profiles.count().await.unwrap(), 1);
    let profile = app.stores.profiles.find(9).await.unwrap().unwrap();
    assert_eq!(profile.first_name, "Grace");
}

#[tokio::test]
async fn test_registration_reaches_profile_and_user_index() {
    let app = helpers::TestApp::new().await;
    let (user_id, _token) = app.register("ada@example.com", "Ada").await;

    helpers::processed(&app.user_sync, 1).await;
    helpers::processed(&app.search_sync, 1).await;

    let profile = app.stores.profiles.find(user_id).await.unwrap().unwrap();
    assert_eq!(profile.email, "ada@example.com");

    let response = app
        .request("GET", "/api/search/users?text=ada", None, None)
        .await;
    assert_eq!(response.body["total_items"], 1);
    assert_eq!(response.body["items"][0]["userId"], user_id);
}

#[tokio::test]
async fn test_profile_update_propagates() {
    let app = helpers::TestApp::new().await;
    let (user_id, token) = app.register("ada@example.com", "Ada").await;
    helpers::processed(&app.user_sync, 1).await;

    let response = app
        .request(
            "PUT",
            "/api/users/me",
            Some(json!({"firstName": "Augusta", "lastName": "King"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    helpers::processed(&app.user_sync, 2).await;

    let profile = app.stores.profiles.find(user_id).await.unwrap().unwrap();
    assert_eq!(profile.first_name, "Augusta");
}

#[tokio::test]
async fn test_two_otp_sends_leave_one_pending() {
    let app = helpers::TestApp::new().await;
    let otps = app.state.auth.otps();

    let first = otps
        .send("ada@example.com", OtpType::EmailVerification)
        .await
        .unwrap();
    let second = otps
        .send("ada@example.com", OtpType::EmailVerification)
        .await
        .unwrap();

    let pending = app
        .stores
        .otps
        .find_pending("ada@example.com", OtpType::EmailVerification)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pending.id, second.id);
    assert_ne!(pending.id, first.id);

    let response = app
        .request(
            "POST",
            "/api/auth/otp/verify",
            Some(json!({"email": "ada@example.com", "type": "EMAIL_VERIFICATION", "code": second.code})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "VERIFIED");
}
