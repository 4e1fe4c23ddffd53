//! # Server Configuration
//!
//! Collected from the environment at startup:
//!
//! | Variable                 | Default | Meaning                               |
//! |--------------------------|---------|---------------------------------------|
//! | `EFACT_PORT`             | `8080`  | TCP port to bind                      |
//! | `EFACT_METRICS_ENABLED`  | `true`  | Anything but `false` enables metrics  |
//! | `EFACT_LOG_FORMAT`       | `text`  | `text` or `json`                      |
//!
//! Signing keys are read separately by `efact_crypto::EnvKeyProvider`.
//! `RUST_LOG` controls the log filter.

use thiserror::Error;

pub const PORT_ENV: &str = "EFACT_PORT";
pub const METRICS_ENABLED_ENV: &str = "EFACT_METRICS_ENABLED";
pub const LOG_FORMAT_ENV: &str = "EFACT_LOG_FORMAT";

/// Invalid configuration value. Fatal at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("EFACT_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("EFACT_LOG_FORMAT must be \"text\" or \"json\", got {0:?}")]
    InvalidLogFormat(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub port: u16,
    pub metrics_enabled: bool,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_enabled: true,
            log_format: LogFormat::Text,
        }
    }
}

impl ApiConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        let metrics_enabled = lookup(METRICS_ENABLED_ENV)
            .map(|v| v.trim().to_lowercase() != "false")
            .unwrap_or(defaults.metrics_enabled);

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "" | "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidLogFormat(raw)),
            },
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            metrics_enabled,
            log_format,
        })
    }
}
