//! Integration tests for notification fan-out, direct notifications and the
//! notification inbox.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use socialhub_consumer::{FriendDirectory, HttpFriendDirectory};
use socialhub_core::config::NotificationConfig;
use socialhub_messaging::MessageBroker;

/// `requester` asks `addressee`, who accepts. Returns the friendship id.
async fn befriend(
    app: &helpers::TestApp,
    requester: &str,
    addressee_id: i64,
    addressee: &str,
) -> i64 {
    let response = app
        .request(
            "POST",
            "/api/friendships",
            Some(json!({"addresseeId": addressee_id})),
            Some(requester),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    let friendship_id = response.body["id"].as_i64().unwrap();

    let response = app
        .request(
            "PUT",
            &format!("/api/friendships/{friendship_id}/accept"),
            None,
            Some(addressee),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    friendship_id
}

async fn inbox(app: &helpers::TestApp, token: &str) -> Vec<Value> {
    let response = app.request("GET", "/api/notifications", None, Some(token)).await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["items"].as_array().cloned().unwrap_or_default()
}

async fn redeliver(app: &helpers::TestApp, topic: &str) -> u64 {
    let messages = app.broker.messages(topic).await;
    for message in &messages {
        app.broker
            .publish(topic, &message.key, message.payload.clone())
            .await
            .unwrap();
    }
    messages.len() as u64
}

#[tokio::test]
async fn test_friendship_accepted_notifies_requester_once() {
    let app = helpers::TestApp::new().await;
    let (acceptor_id, acceptor) = app.register("ada@example.com", "Ada").await;
    let (requester_id, requester) = app.register("bob@example.com", "Bob").await;

    befriend(&app, &requester, acceptor_id, &acceptor).await;
    helpers::processed(&app.notifications, 2).await;

    let replayed = redeliver(&app, "notification-events").await;
    helpers::processed(&app.notifications, 2 + replayed).await;

    let accepted: Vec<Value> = inbox(&app, &requester)
        .await
        .into_iter()
        .filter(|n| n["type"] == "ACCEPT_FRIENDSHIP")
        .collect();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0]["receiverId"], requester_id);
    assert_eq!(accepted[0]["senderId"], acceptor_id);

    let requests: Vec<Value> = inbox(&app, &acceptor)
        .await
        .into_iter()
        .filter(|n| n["type"] == "FRIEND_REQUEST")
        .collect();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_new_post_fans_out_to_friends_only() {
    let app = helpers::TestApp::new().await;
    let (author_id, author) = app.register("ada@example.com", "Ada").await;
    let (friend_a_id, friend_a) = app.register("bob@example.com", "Bob").await;
    let (friend_b_id, friend_b) = app.register("cy@example.com", "Cy").await;
    let (stranger_id, stranger) = app.register("dee@example.com", "Dee").await;

    befriend(&app, &author, friend_a_id, &friend_a).await;
    befriend(&app, &author, friend_b_id, &friend_b).await;
    helpers::processed(&app.notifications, 4).await;

    let post = json!({
        "actionType": "CREATE",
        "postId": 500,
        "post": {
            "id": 500,
            "content": "hello friends",
            "createdAt": 1_700_000_000,
            "author": {"userId": author_id, "firstName": "Ada", "lastName": "Tester"}
        }
    });
    app.publish_raw("post-events", "500", &post).await;
    app.publish_raw("post-events", "500", &post).await;
    helpers::processed(&app.notifications, 6).await;

    for token in [&friend_a, &friend_b] {
        let new_posts: Vec<Value> = inbox(&app, token)
            .await
            .into_iter()
            .filter(|n| n["type"] == "NEW_POST")
            .collect();
        assert_eq!(new_posts.len(), 1);
        assert_eq!(new_posts[0]["senderId"], author_id);
        assert_eq!(new_posts[0]["referenceId"], 500);
    }
    assert!(
        inbox(&app, &author)
            .await
            .iter()
            .all(|n| n["type"] != "NEW_POST")
    );
    assert!(inbox(&app, &stranger).await.is_empty(), "user {stranger_id}");
}

#[tokio::test]
async fn test_post_like_notifies_author() {
    let app = helpers::TestApp::new().await;
    let (author_id, author) = app.register("ada@example.com", "Ada").await;
    let (_, fan) = app.register("bob@example.com", "Bob").await;

    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                "/api/posts/77/likes",
                Some(json!({"postAuthorId": author_id})),
                Some(&fan),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["likeCount"], 1);
    }
    helpers::processed(&app.notifications, 1).await;

    let likes: Vec<Value> = inbox(&app, &author)
        .await
        .into_iter()
        .filter(|n| n["type"] == "LIKE_POST")
        .collect();
    assert_eq!(likes.len(), 1);
}

#[tokio::test]
async fn test_inbox_operations_are_scoped_to_owner() {
    let app = helpers::TestApp::new().await;
    let (acceptor_id, acceptor) = app.register("ada@example.com", "Ada").await;
    let (_, requester) = app.register("bob@example.com", "Bob").await;
    befriend(&app, &requester, acceptor_id, &acceptor).await;
    helpers::processed(&app.notifications, 2).await;

    let mine = inbox(&app, &acceptor).await;
    assert_eq!(mine.len(), 1);
    let id = mine[0]["id"].as_str().unwrap().to_string();

    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&acceptor))
        .await;
    assert_eq!(unread.body["count"], 1);

    let foreign = app
        .request("PUT", &format!("/api/notifications/{id}/read"), None, Some(&requester))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let read = app
        .request("PUT", &format!("/api/notifications/{id}/read"), None, Some(&acceptor))
        .await;
    assert_eq!(read.status, StatusCode::OK);
    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&acceptor))
        .await;
    assert_eq!(unread.body["count"], 0);

    let unread_again = app
        .request("PUT", &format!("/api/notifications/{id}/unread"), None, Some(&acceptor))
        .await;
    assert_eq!(unread_again.status, StatusCode::OK);
    let all = app
        .request("PUT", "/api/notifications/read-all", None, Some(&acceptor))
        .await;
    assert_eq!(all.body["count"], 1);

    let deleted = app
        .request("DELETE", &format!("/api/notifications/{id}"), None, Some(&acceptor))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(inbox(&app, &acceptor).await.is_empty());
}

#[tokio::test]
async fn test_friend_lookup_over_http() {
    let app = helpers::TestApp::new().await;
    let (ada_id, ada) = app.register("ada@example.com", "Ada").await;
    let (bob_id, bob) = app.register("bob@example.com", "Bob").await;
    befriend(&app, &ada, bob_id, &bob).await;

    let addr = app.serve().await;
    let directory = HttpFriendDirectory::new(&NotificationConfig {
        friend_service_url: format!("http://{addr}"),
        ..NotificationConfig::default()
    })
    .unwrap();

    assert_eq!(directory.friend_ids(ada_id).await.unwrap(), vec![bob_id]);
    assert_eq!(directory.friend_ids(bob_id).await.unwrap(), vec![ada_id]);
}
