//! Chat presence handlers.

use axum::Json;
use axum::extract::{Path, State};

use socialhub_core::error::AppError;
use socialhub_realtime::PresenceChange;

use crate::dto::request::ConnectRequest;
use crate::dto::validated;
use crate::error::ApiResult;
use crate::extractors::Identity;
use crate::state::AppState;

/// POST /api/presence/sessions
pub async fn connect(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<ConnectRequest>,
) -> ApiResult<Json<PresenceChange>> {
    let req = validated(req)?;
    state
        .presence
        .add_if_owned_or_vacant(req.session_id, identity.user_id)
        .map(Json)
        .map_err(|_| AppError::conflict("Session id is already in use").into())
}

/// DELETE /api/presence/sessions/{session_id}
pub async fn disconnect(
    State(state): State<AppState>,
    identity: Identity,
    Path(session_id): Path<String>,
) -> ApiResult<Json<PresenceChange>> {
    state
        .presence
        .remove_owned(&session_id, identity.user_id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Session '{session_id}' not found")).into())
}

/// GET /api/presence/online
pub async fn online_users(State(state): State<AppState>) -> Json<Vec<i64>> {
    Json(state.presence.online_user_ids())
}
