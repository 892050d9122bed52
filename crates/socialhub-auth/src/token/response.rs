//! Token validation response body.

use serde::{Deserialize, Serialize};

use crate::jwt::Claims;

/// Result of validating a bearer token.
///
/// Returned with HTTP 200 whether or not the token is valid; callers branch
/// on `valid`. Identity fields are only present when valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub message: String,
}

impl ValidationResponse {
    pub fn valid(user_id: i64, email: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            valid: true,
            user_id: Some(user_id),
            email: Some(email.into()),
            roles,
            message: "Token is valid".to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            user_id: None,
            email: None,
            roles: Vec::new(),
            message: message.into(),
        }
    }

    pub(crate) fn from_claims(claims: Claims, user_id: i64) -> Self {
        Self::valid(user_id, claims.email, claims.roles)
    }

    /// Roles joined for the `X-User-Roles` header.
    pub fn roles_header(&self) -> String {
        self.roles.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_omits_identity() {
        let json = serde_json::to_value(ValidationResponse::invalid("Token not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"valid": false, "roles": [], "message": "Token not found"})
        );
    }

    #[test]
    fn test_valid_wire_shape() {
        let response = ValidationResponse::valid(7, "a@example.com", vec!["USER".into(), "ADMIN".into()]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(response.roles_header(), "USER,ADMIN");
    }
}
