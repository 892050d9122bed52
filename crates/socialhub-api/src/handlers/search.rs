//! Search handlers over the projected indexes.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};

use socialhub_core::types::PageResponse;
use socialhub_database::repositories::SearchIndex;
use socialhub_entity::search::{CommentDocument, PostDocument, SearchDocument, UserDocument};

use crate::dto::request::SearchParams;
use crate::error::ApiResult;
use crate::state::AppState;

async fn run<D: SearchDocument>(
    index: &Arc<dyn SearchIndex<D>>,
    params: SearchParams,
) -> ApiResult<Json<PageResponse<D>>> {
    Ok(Json(index.query(&params.into_filter()).await?))
}

/// GET /api/search/posts
pub async fn posts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<PostDocument>>> {
    run(&state.stores.post_index, params).await
}

/// GET /api/search/comments
pub async fn comments(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<CommentDocument>>> {
    run(&state.stores.comment_index, params).await
}

/// GET /api/search/users
pub async fn users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<UserDocument>>> {
    run(&state.stores.user_index, params).await
}
