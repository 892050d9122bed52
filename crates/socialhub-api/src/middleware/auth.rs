//! Token-validation filters.
//!
//! Two shapes share one contract. The gateway filter forwards the caller as
//! `X-User-Id`/`X-User-Email`/`X-User-Roles` headers for downstream
//! handlers; the per-service filter stores an [`Identity`] in the request
//! extensions. Either way an invalid token ends the request with 401 and the
//! validator's message, and client-supplied identity headers never survive.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use socialhub_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::Identity;
use crate::state::AppState;

/// Bearer token from the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Gateway shape: validate, then inject identity headers.
pub async fn gateway_filter(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    Identity::strip_headers(request.headers_mut());
    let identity = authenticate(&state, request.headers()).await?;
    identity.write_headers(request.headers_mut())?;
    Ok(next.run(request).await)
}

/// Per-service shape: validate, then attach the principal to the request.
pub async fn service_filter(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    Identity::strip_headers(request.headers_mut());
    let identity = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, AppError> {
    let token = bearer_token(headers).ok_or_else(|| AppError::authentication("Missing token"))?;
    let response = state.validator.validate(token).await;
    if !response.valid {
        debug!(reason = %response.message, "Rejected request token");
    }
    Identity::try_from(response)
}
