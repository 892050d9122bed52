//! `Identity` extractor: the authenticated caller as established by a filter.
//!
//! The per-service filter stores the identity in request extensions; the
//! gateway filter forwards it as `X-User-*` headers. The extractor reads
//! extensions first, then the headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};

use socialhub_auth::ValidationResponse;
use socialhub_core::error::AppError;

use crate::error::ApiError;

/// Header carrying the caller's numeric id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Header carrying the caller's roles, comma-joined.
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub roles: Vec<String>,
}

impl Identity {
    /// Read the identity a gateway forwarded.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let user_id = header_str(headers, USER_ID_HEADER)
            .ok_or_else(|| AppError::authentication("Missing token"))?
            .parse::<i64>()
            .map_err(|_| AppError::authentication("Malformed X-User-Id header"))?;
        let email = header_str(headers, USER_EMAIL_HEADER)
            .unwrap_or_default()
            .to_string();
        let roles = header_str(headers, USER_ROLES_HEADER)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            user_id,
            email,
            roles,
        })
    }

    /// Write the identity as `X-User-*` headers, replacing any present.
    pub fn write_headers(&self, headers: &mut HeaderMap) -> Result<(), AppError> {
        headers.insert(USER_ID_HEADER, HeaderValue::from(self.user_id));
        headers.insert(USER_EMAIL_HEADER, header_value(&self.email)?);
        headers.insert(USER_ROLES_HEADER, header_value(&self.roles.join(","))?);
        Ok(())
    }

    /// Remove caller-supplied identity headers.
    pub fn strip_headers(headers: &mut HeaderMap) {
        headers.remove(USER_ID_HEADER);
        headers.remove(USER_EMAIL_HEADER);
        headers.remove(USER_ROLES_HEADER);
    }
}

impl TryFrom<ValidationResponse> for Identity {
    type Error = AppError;

    fn try_from(response: ValidationResponse) -> Result<Self, Self::Error> {
        if !response.valid {
            return Err(AppError::authentication(response.message));
        }
        let user_id = response
            .user_id
            .ok_or_else(|| AppError::authentication("Validation response carried no user id"))?;
        Ok(Self {
            user_id,
            email: response.email.unwrap_or_default(),
            roles: response.roles,
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(identity.clone());
        }
        Ok(Self::from_headers(&parts.headers)?)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|_| AppError::authentication("Identity contains characters not allowed in headers"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Identity {
        Identity {
            user_id: 7,
            email: "ada@example.com".to_string(),
            roles: vec!["USER".to_string(), "ADMIN".to_string()],
        }
    }

    #[test]
    fn test_headers_round_trip_identity() {
        let mut headers = HeaderMap::new();
        ada().write_headers(&mut headers).unwrap();
        assert_eq!(headers.get(USER_ROLES_HEADER).unwrap(), "USER,ADMIN");
        assert_eq!(Identity::from_headers(&headers).unwrap(), ada());
    }

    #[test]
    fn test_missing_user_id_is_unauthenticated() {
        let err = Identity::from_headers(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.kind, socialhub_core::error::ErrorKind::Authentication);
    }

    #[test]
    fn test_strip_removes_spoofed_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("1"));
        headers.insert(USER_ROLES_HEADER, HeaderValue::from_static("ADMIN"));
        Identity::strip_headers(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_invalid_response_keeps_message() {
        let err = Identity::try_from(ValidationResponse::invalid("Token has been revoked")).unwrap_err();
        assert_eq!(err.message, "Token has been revoked");
    }
}
