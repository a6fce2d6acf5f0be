//! Configuration management for the prompt dashboard
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, then `config/{env}.yaml`)
//! - Environment variables (`DASHBOARD__` prefix, `__` between sections)
//!
//! The hosted interpreter API key also falls back to `GOOGLE_API_KEY`.

pub mod settings;

pub use settings::{
    load_settings, load_settings_from, DataConfig, DatasetKeywordConfig, FieldSynonymConfig,
    HostedConfig, InterpreterConfig, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    Settings, DEFAULT_CORS_ORIGIN, SUPPORTED_PROVIDERS,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for prompt_dashboard_core::Error {
    fn from(err: ConfigError) -> Self {
        prompt_dashboard_core::Error::Config(err.to_string())
    }
}
