//! Provider-specific user attribute extraction.
//!
//! Each provider returns its user-info document in its own shape. The
//! provider is resolved once from the client registration id; an unknown id
//! is a configuration error, raised at resolution time rather than on the
//! first login.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use socialhub_core::error::AppError;

/// Identity attributes common to every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthUserInfo {
    pub email: String,
    pub provider_id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Supported OAuth2 identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    GitHub,
    Facebook,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [Self::Google, Self::GitHub, Self::Facebook];

    pub fn registration_id(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
            Self::Facebook => "facebook",
        }
    }

    /// Resolve a client registration id, case-insensitively.
    pub fn from_registration_id(id: &str) -> Result<Self, AppError> {
        Self::ALL
            .into_iter()
            .find(|p| p.registration_id().eq_ignore_ascii_case(id.trim()))
            .ok_or_else(|| AppError::configuration(format!("Unsupported OAuth provider: '{id}'")))
    }

    /// Pull the common attributes out of a provider user-info document.
    pub fn extract(&self, attributes: &Value) -> Result<OAuthUserInfo, AppError> {
        let email = string_attr(attributes, "email")
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AppError::authentication(format!("{self} did not return an email address"))
            })?;

        let (provider_id, first_name, last_name) = match self {
            Self::Google => (
                string_attr(attributes, "sub"),
                string_attr(attributes, "given_name"),
                string_attr(attributes, "family_name"),
            ),
            Self::GitHub => {
                let (first, last) = string_attr(attributes, "name")
                    .or_else(|| string_attr(attributes, "login"))
                    .map(|n| split_name(&n))
                    .unwrap_or_default();
                (string_attr(attributes, "id"), Some(first), Some(last))
            }
            Self::Facebook => {
                let split = string_attr(attributes, "name").map(|n| split_name(&n));
                (
                    string_attr(attributes, "id"),
                    string_attr(attributes, "first_name")
                        .or_else(|| split.as_ref().map(|(f, _)| f.clone())),
                    string_attr(attributes, "last_name")
                        .or_else(|| split.as_ref().map(|(_, l)| l.clone())),
                )
            }
        };

        let provider_id = provider_id
            .ok_or_else(|| AppError::authentication(format!("{self} did not return a user id")))?;

        Ok(OAuthUserInfo {
            email: email.to_lowercase(),
            provider_id,
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
        })
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Google => "Google",
            Self::GitHub => "GitHub",
            Self::Facebook => "Facebook",
        })
    }
}

impl FromStr for OAuthProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_registration_id(s)
    }
}

/// String attribute; numeric ids are rendered as strings.
fn string_attr(attributes: &Value, key: &str) -> Option<String> {
    match attributes.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// "Ada King Lovelace" -> ("Ada", "King Lovelace").
fn split_name(full: &str) -> (String, String) {
    let full = full.trim();
    match full.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (full.to_string(), String::new()),
    }
}
