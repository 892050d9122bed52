//! Request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use socialhub_core::types::PageRequest;
use socialhub_entity::otp::OtpType;
use socialhub_entity::search::SearchFilter;

/// Ask for a one-time code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
}

/// Check a one-time code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

/// OAuth login with a token issued by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLoginRequest {
    #[validate(length(min = 1, message = "Access token is required"))]
    pub access_token: String,
}

/// Send a friend request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub addressee_id: i64,
}

/// Like a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_author_id: i64,
}

/// Register a chat session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    #[validate(length(min = 1, max = 128, message = "Session id is required"))]
    pub session_id: String,
}

/// Search query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub author_id: Option<i64>,
    #[serde(alias = "q")]
    pub text: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl SearchParams {
    pub fn into_filter(self) -> SearchFilter {
        let defaults = PageRequest::default();
        SearchFilter {
            author_id: self.author_id,
            text: self.text,
            page: PageRequest::new(
                self.page.unwrap_or(defaults.page),
                self.page_size.unwrap_or(defaults.page_size),
            ),
        }
    }
}
