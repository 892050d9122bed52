//! Notification handlers. Every route is scoped to the caller.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use socialhub_core::types::PageResponse;
use socialhub_entity::notification::Notification;

use crate::dto::response::{CountResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{Identity, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<PageResponse<Notification>>> {
    let page = state
        .notifications
        .list(identity.user_id, params.into_page_request())
        .await?;
    Ok(Json(page))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<CountResponse>> {
    let count = state.notifications.unread_count(identity.user_id).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(state.notifications.get(identity.user_id, id).await?))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.notifications.mark_read(identity.user_id, id).await?;
    Ok(Json(MessageResponse::new("Marked as read")))
}

/// PUT /api/notifications/{id}/unread
pub async fn mark_unread(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.notifications.mark_unread(identity.user_id, id).await?;
    Ok(Json(MessageResponse::new("Marked as unread")))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<CountResponse>> {
    let count = state.notifications.mark_all_read(identity.user_id).await?;
    Ok(Json(CountResponse { count }))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.notifications.delete(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
