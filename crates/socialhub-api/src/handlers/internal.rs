//! Service-to-service endpoints. Not exposed through the gateway filter.

use axum::Json;
use axum::extract::{Path, State};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /internal/friendships/{user_id}/friend-ids
pub async fn friend_ids(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<i64>>> {
    Ok(Json(state.friendships.friend_ids(user_id).await?))
}
