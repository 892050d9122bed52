//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section carries serde defaults so that an empty
//! configuration produces a runnable all-in-memory deployment.

pub mod app;
pub mod auth;
pub mod broker;
pub mod database;
pub mod gateway;
pub mod logging;
pub mod notification;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AuthConfig, OAuthConfig};
pub use self::broker::BrokerConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::gateway::GatewayConfig;
pub use self::logging::LoggingConfig;
pub use self::notification::NotificationConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay) and `SOCIALHUB__*`
/// environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store backend settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token, OTP and signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Message broker settings.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Gateway token-validation settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Notification fan-out and retention settings.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Background sweep settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Merges `config/default`, the `config/{env}` overlay and environment
    /// variables prefixed with `SOCIALHUB__`. Missing files are allowed.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SOCIALHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an inline TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
