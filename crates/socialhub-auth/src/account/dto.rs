//! Request and response bodies for account flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use socialhub_core::error::AppError;
use socialhub_entity::user::UserAccount;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Password reset with a `PASSWORD_RESET` one-time code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Profile update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Returned by register, login and OAuth login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserAccount,
}

/// Run `validator` rules, mapping failures into a validation error.
pub(crate) fn check<T: Validate>(request: &T) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rules() {
        let mut req = RegisterRequest {
            email: "ada@example.com".into(),
            password: "longenough".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone_number: None,
        };
        assert!(check(&req).is_ok());

        req.email = "nope".into();
        assert!(check(&req).is_err());

        req.email = "ada@example.com".into();
        req.password = "short".into();
        assert!(check(&req).is_err());
    }

    #[test]
    fn test_register_wire_names() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@example.com","password":"pw123456","firstName":"A","lastName":"B"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name, "A");
        assert_eq!(req.phone_number, None);
    }
}
