//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files plus `DINEHUB__*` environment variables. Each sub-module
//! represents a logical configuration section, and every field carries a
//! serde default so an empty configuration is valid.

pub mod api;
pub mod auth;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::auth::AuthConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::{NotificationsConfig, RealtimeConfig};

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend REST API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Credential persistence settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Live event channel settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Notification feed settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for an environment.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and environment
    /// variables prefixed with `DINEHUB__`. Missing files are skipped.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        Self::finish(builder)
    }

    /// Load configuration from a single explicit file, then environment overrides.
    pub fn load_file(path: &str) -> Result<Self, AppError> {
        let builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("DINEHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        tracing::debug!(
            api = %parsed.api.base_url,
            realtime = %parsed.realtime.endpoint,
            "Configuration loaded"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.notifications.page_size, 50);
        assert_eq!(config.realtime.join_event, "join");
        assert_eq!(config.realtime.push_event, "new_notification");
        assert!(config.realtime.with_credentials);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api": {"base_url": "https://pos.example.com/api"}}"#)
                .unwrap();
        assert_eq!(config.api.base_url, "https://pos.example.com/api");
        assert_eq!(config.api.timeout_seconds, 15);
    }
}
