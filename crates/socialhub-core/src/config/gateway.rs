//! Gateway token-validation configuration.

use serde::{Deserialize, Serialize};

/// How the gateway and per-service filters reach the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the auth service.
    #[serde(default = "default_auth_service_url")]
    pub auth_service_url: String,
    /// Path of the validation endpoint on the auth service.
    #[serde(default = "default_validation_path")]
    pub validation_path: String,
    /// Upper bound on a validation round trip. Exceeding it rejects the request.
    #[serde(default = "default_validation_timeout")]
    pub validation_timeout_ms: u64,
    /// Validate in-process instead of calling the auth service over HTTP.
    #[serde(default = "default_local_validation")]
    pub local_validation: bool,
}

impl GatewayConfig {
    /// Full URL of the validation endpoint.
    pub fn validation_url(&self) -> String {
        format!(
            "{}{}",
            self.auth_service_url.trim_end_matches('/'),
            self.validation_path
        )
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth_service_url: default_auth_service_url(),
            validation_path: default_validation_path(),
            validation_timeout_ms: default_validation_timeout(),
            local_validation: default_local_validation(),
        }
    }
}

fn default_auth_service_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_validation_path() -> String {
    "/api/auth/validate".to_string()
}

fn default_validation_timeout() -> u64 {
    2000
}

fn default_local_validation() -> bool {
    true
}
