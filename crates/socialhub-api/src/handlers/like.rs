//! Post like handlers.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::request::LikeRequest;
use crate::dto::response::LikeResponse;
use crate::error::ApiResult;
use crate::extractors::Identity;
use crate::state::AppState;

/// POST /api/posts/{post_id}/likes
pub async fn like(
    State(state): State<AppState>,
    identity: Identity,
    Path(post_id): Path<i64>,
    Json(req): Json<LikeRequest>,
) -> ApiResult<Json<LikeResponse>> {
    let changed = state
        .likes
        .like(post_id, req.post_author_id, identity.user_id)
        .await?;
    Ok(Json(LikeResponse {
        changed,
        like_count: state.likes.like_count(post_id),
    }))
}

/// DELETE /api/posts/{post_id}/likes
pub async fn unlike(
    State(state): State<AppState>,
    identity: Identity,
    Path(post_id): Path<i64>,
) -> Json<LikeResponse> {
    let changed = state.likes.unlike(post_id, identity.user_id);
    Json(LikeResponse {
        changed,
        like_count: state.likes.like_count(post_id),
    })
}
