//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing, token lifetime and OTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// `iss` claim written into and required from every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
    /// One-time password lifetime in minutes.
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_minutes: i64,
    /// Number of digits in a one-time password.
    #[serde(default = "default_otp_length")]
    pub otp_length: u32,
    /// Roles granted to newly registered accounts.
    #[serde(default = "default_roles")]
    pub default_roles: Vec<String>,
    /// Provider user-info endpoints used by OAuth login.
    #[serde(default)]
    pub oauth: OAuthConfig,
}

/// Where OAuth login exchanges a provider access token for user info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_google_userinfo")]
    pub google_userinfo_url: String,
    #[serde(default = "default_github_userinfo")]
    pub github_userinfo_url: String,
    #[serde(default = "default_facebook_userinfo")]
    pub facebook_userinfo_url: String,
    /// Bound on each user-info request.
    #[serde(default = "default_userinfo_timeout")]
    pub userinfo_timeout_ms: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            google_userinfo_url: default_google_userinfo(),
            github_userinfo_url: default_github_userinfo(),
            facebook_userinfo_url: default_facebook_userinfo(),
            userinfo_timeout_ms: default_userinfo_timeout(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: default_issuer(),
            token_ttl_hours: default_token_ttl(),
            otp_ttl_minutes: default_otp_ttl(),
            otp_length: default_otp_length(),
            default_roles: default_roles(),
            oauth: OAuthConfig::default(),
        }
    }
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_issuer() -> String {
    "socialhub-auth".to_string()
}

fn default_token_ttl() -> i64 {
    24
}

fn default_otp_ttl() -> i64 {
    5
}

fn default_otp_length() -> u32 {
    6
}

fn default_roles() -> Vec<String> {
    vec!["USER".to_string()]
}

fn default_google_userinfo() -> String {
    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
}

fn default_github_userinfo() -> String {
    "https://api.github.com/user".to_string()
}

fn default_facebook_userinfo() -> String {
    "https://graph.facebook.com/me?fields=id,name,email,first_name,last_name".to_string()
}

fn default_userinfo_timeout() -> u64 {
    5000
}
