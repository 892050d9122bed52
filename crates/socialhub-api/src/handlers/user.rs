//! Current-user handlers.

use axum::Json;
use axum::extract::State;

use socialhub_auth::account::UpdateProfileRequest;
use socialhub_entity::user::UserAccount;

use crate::error::ApiResult;
use crate::extractors::Identity;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, identity: Identity) -> ApiResult<Json<UserAccount>> {
    Ok(Json(state.auth.find(identity.user_id).await?))
}

/// PUT /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserAccount>> {
    Ok(Json(state.auth.update_profile(identity.user_id, req).await?))
}
