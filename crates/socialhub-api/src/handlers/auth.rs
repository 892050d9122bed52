//! Auth handlers: validation, register, login, OAuth, OTP, logout, passwords.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

use socialhub_auth::{OAuthProvider, ValidationResponse};
use socialhub_auth::account::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use socialhub_core::error::AppError;

use crate::dto::request::{OAuthLoginRequest, SendOtpRequest, VerifyOtpRequest};
use crate::dto::response::{CountResponse, MessageResponse, OtpVerifyResponse};
use crate::dto::validated;
use crate::error::ApiResult;
use crate::extractors::Identity;
use crate::middleware::bearer_token;
use crate::state::AppState;

/// GET /api/auth/validate
///
/// Always 200; callers branch on `valid`.
pub async fn validate(State(state): State<AppState>, headers: HeaderMap) -> Json<ValidationResponse> {
    let response = match bearer_token(&headers) {
        Some(token) => state.auth.tokens().validate(token).await,
        None => ValidationResponse::invalid("Missing token"),
    };
    Json(response)
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(state.auth.login(req).await?))
}

/// POST /api/auth/oauth/{provider}
///
/// Body carries the provider access token; user info is fetched from the
/// provider with it.
pub async fn oauth_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(req): Json<OAuthLoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let req = validated(req)?;
    let resolved = OAuthProvider::from_registration_id(&provider)?;
    let attributes = state.oauth.fetch(resolved, &req.access_token).await?;
    Ok(Json(state.auth.oauth_login(&provider, &attributes).await?))
}

/// POST /api/auth/otp/send
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let req = validated(req)?;
    state.auth.otps().send(&req.email, req.otp_type).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Verification code sent")),
    ))
}

/// POST /api/auth/otp/verify
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> ApiResult<Json<OtpVerifyResponse>> {
    let req = validated(req)?;
    let status = state
        .auth
        .otps()
        .verify(&req.email, req.otp_type, &req.code)
        .await?;
    Ok(Json(OtpVerifyResponse { status }))
}

/// POST /api/auth/password/reset
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.auth.reset_password(req).await?;
    Ok(Json(MessageResponse::new("Password has been reset")))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<MessageResponse>> {
    let token = bearer_token(&headers).ok_or_else(|| AppError::authentication("Missing token"))?;
    state.auth.logout(token).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}

/// POST /api/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<CountResponse>> {
    let count = state.auth.logout_all(identity.user_id).await?;
    Ok(Json(CountResponse { count }))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.auth.change_password(identity.user_id, req).await?;
    Ok(Json(MessageResponse::new(
        "Password changed; all sessions were signed out",
    )))
}
