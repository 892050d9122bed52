//! Friendship handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use socialhub_entity::friendship::Friendship;

use crate::dto::request::FriendRequestBody;
use crate::error::ApiResult;
use crate::extractors::Identity;
use crate::state::AppState;

/// POST /api/friendships
pub async fn send_request(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<FriendRequestBody>,
) -> ApiResult<(StatusCode, Json<Friendship>)> {
    let friendship = state
        .friendships
        .send_request(identity.user_id, req.addressee_id)
        .await?;
    Ok((StatusCode::CREATED, Json(friendship)))
}

/// PUT /api/friendships/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
) -> ApiResult<Json<Friendship>> {
    Ok(Json(state.friendships.accept(id, identity.user_id).await?))
}

/// PUT /api/friendships/{id}/decline
pub async fn decline(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
) -> ApiResult<Json<Friendship>> {
    Ok(Json(state.friendships.decline(id, identity.user_id).await?))
}

/// GET /api/friendships/friend-ids
pub async fn my_friend_ids(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<i64>>> {
    Ok(Json(state.friendships.friend_ids(identity.user_id).await?))
}
