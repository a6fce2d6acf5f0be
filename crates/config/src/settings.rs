//! Main settings module

use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use prompt_dashboard_core::DatasetType;

use crate::ConfigError;

/// Prefix of environment variable overrides
const ENV_PREFIX: &str = "DASHBOARD";

/// Fallback variable for the hosted interpreter API key
const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Hosted interpreter providers understood by the llm crate
pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "ollama"];

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Prompt interpretation (rule-based vocabulary and hosted service)
    #[serde(default)]
    pub interpreter: InterpreterConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_hosted()?;
        self.validate_vocabulary()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 Only {} will be allowed.",
                DEFAULT_CORS_ORIGIN
            );
        }

        Ok(())
    }

    fn validate_hosted(&self) -> Result<(), ConfigError> {
        let hosted = &self.interpreter.hosted;

        if !SUPPORTED_PROVIDERS.contains(&hosted.provider.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.hosted.provider".to_string(),
                message: format!(
                    "Unknown provider '{}', expected one of: {}",
                    hosted.provider,
                    SUPPORTED_PROVIDERS.join(", ")
                ),
            });
        }

        if hosted.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.hosted.timeout_ms".to_string(),
                message: "Timeout must be at least 1 ms".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&hosted.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.hosted.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", hosted.temperature),
            });
        }

        if hosted.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.hosted.max_tokens".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    fn validate_vocabulary(&self) -> Result<(), ConfigError> {
        let blank_synonym = self
            .interpreter
            .field_synonyms
            .iter()
            .any(|s| s.keyword.trim().is_empty() || s.field.trim().is_empty());
        if blank_synonym {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.field_synonyms".to_string(),
                message: "Keyword and field must not be empty".to_string(),
            });
        }

        // Dataset keywords are matched against single whitespace tokens
        if let Some(bad) = self
            .interpreter
            .dataset_keywords
            .iter()
            .find(|k| k.keyword.trim().is_empty() || k.keyword.split_whitespace().count() != 1)
        {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.dataset_keywords".to_string(),
                message: format!("'{}' must be a single word", bad.keyword),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins; empty allows only [`DEFAULT_CORS_ORIGIN`]
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Origin allowed when CORS is enabled without configured origins
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Extra field synonym for the rule-based interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSynonymConfig {
    pub keyword: String,
    pub field: String,
    pub dataset: DatasetType,
}

/// Extra single-word dataset keyword for the rule-based interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetKeywordConfig {
    pub keyword: String,
    pub dataset: DatasetType,
}

/// Prompt interpretation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InterpreterConfig {
    /// Appended to (or replacing entries of) the standard field synonyms
    #[serde(default)]
    pub field_synonyms: Vec<FieldSynonymConfig>,

    /// Appended to (or replacing entries of) the standard dataset keywords
    #[serde(default)]
    pub dataset_keywords: Vec<DatasetKeywordConfig>,

    #[serde(default)]
    pub hosted: HostedConfig,
}

/// Hosted interpretation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedConfig {
    /// Use the hosted service when an API key (or a local provider) is available
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// "openai" (any OpenAI-compatible endpoint) or "ollama"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's default endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Falls back to GOOGLE_API_KEY when unset
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Overall budget for one hosted interpretation, retries included
    #[serde(default = "default_hosted_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}
fn default_max_retries() -> u32 {
    2
}
fn default_hosted_timeout_ms() -> u64 {
    15_000
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> u32 {
    2048
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: default_provider(),
            endpoint: None,
            model: default_model(),
            api_key: None,
            max_retries: default_max_retries(),
            timeout_ms: default_hosted_timeout_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Directory holding sales.json, users.json and products.json;
    /// the bundled datasets are used when unset
    #[serde(default)]
    pub directory: Option<String>,

    /// Artificial delay before answering data requests, for UI demos
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    /// Install the Prometheus recorder and serve /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `./config` and the environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (DASHBOARD__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("."), env)
}

/// Load settings with `config/` resolved relative to `base_dir`
pub fn load_settings_from(base_dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    build_settings(base_dir, env, None)
}

/// `vars` replaces the process environment when given
fn build_settings(
    base_dir: &Path,
    env: Option<&str>,
    vars: Option<HashMap<String, String>>,
) -> Result<Settings, ConfigError> {
    let config_dir = base_dir.join("config");
    let mut builder = Config::builder();

    builder = builder.add_source(
        File::with_name(&config_dir.join("default").to_string_lossy()).required(false),
    );

    if let Some(env_name) = env {
        builder = builder
            .add_source(File::with_name(&config_dir.join(env_name).to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(vars.clone()),
    );

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;

    if settings.interpreter.hosted.api_key.is_none() {
        let fallback = match &vars {
            Some(vars) => vars.get(API_KEY_VAR).cloned(),
            None => std::env::var(API_KEY_VAR).ok(),
        };
        settings.interpreter.hosted.api_key = fallback.filter(|key| !key.trim().is_empty());
    }

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        port = settings.server.port,
        hosted_provider = %settings.interpreter.hosted.provider,
        hosted_key_present = settings.interpreter.hosted.api_key.is_some(),
        "Settings loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, name: &str, contents: &str) {
        let config_dir = dir.join("config");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(format!("{}.yaml", name)), contents).unwrap();
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.interpreter.hosted.model, "gemini-2.5-flash-lite");
        assert_eq!(settings.interpreter.hosted.max_retries, 2);
        assert_eq!(settings.data.simulated_latency_ms, 0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();

        settings.server.port = 0;
        assert!(settings.validate_server().is_err());
        settings.server.port = 8080;

        settings.server.timeout_seconds = 0;
        assert!(settings.validate_server().is_err());
        settings.server.timeout_seconds = 30;

        assert!(settings.validate_server().is_ok());
    }

    #[test]
    fn test_hosted_validation() {
        let mut settings = Settings::default();

        settings.interpreter.hosted.provider = "claude".to_string();
        assert!(settings.validate_hosted().is_err());
        settings.interpreter.hosted.provider = "ollama".to_string();

        settings.interpreter.hosted.temperature = 3.5;
        assert!(settings.validate_hosted().is_err());
        settings.interpreter.hosted.temperature = 0.0;

        settings.interpreter.hosted.timeout_ms = 0;
        assert!(settings.validate_hosted().is_err());
        settings.interpreter.hosted.timeout_ms = 500;

        assert!(settings.validate_hosted().is_ok());
    }

    #[test]
    fn test_vocabulary_validation() {
        let mut settings = Settings::default();
        settings.interpreter.dataset_keywords.push(DatasetKeywordConfig {
            keyword: "sales team".to_string(),
            dataset: DatasetType::Users,
        });
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "interpreter.dataset_keywords"
        ));
    }

    #[test]
    fn test_layered_files() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "default",
            "server:\n  port: 9000\ndata:\n  simulated_latency_ms: 300\n",
        );
        write_config(
            dir.path(),
            "production",
            "environment: production\nserver:\n  port: 9100\n  cors_origins:\n    - https://dash.example.com\n",
        );

        let dev = build_settings(dir.path(), None, vars(&[])).unwrap();
        assert_eq!(dev.server.port, 9000);
        assert_eq!(dev.data.simulated_latency_ms, 300);
        assert_eq!(dev.environment, RuntimeEnvironment::Development);

        let prod = build_settings(dir.path(), Some("production"), vars(&[])).unwrap();
        assert_eq!(prod.server.port, 9100);
        assert_eq!(prod.server.cors_origins, vec!["https://dash.example.com"]);
        // Untouched keys still come from default.yaml
        assert_eq!(prod.data.simulated_latency_ms, 300);
    }

    #[test]
    fn test_environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "default", "server:\n  port: 9000\n");

        let settings = build_settings(
            dir.path(),
            None,
            vars(&[
                ("DASHBOARD__SERVER__PORT", "7000"),
                ("DASHBOARD__INTERPRETER__HOSTED__PROVIDER", "ollama"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.server.port, 7000);
        assert_eq!(settings.interpreter.hosted.provider, "ollama");
    }

    #[test]
    fn test_api_key_fallback() {
        let dir = tempfile::tempdir().unwrap();

        let settings = build_settings(dir.path(), None, vars(&[("GOOGLE_API_KEY", "g-key")])).unwrap();
        assert_eq!(settings.interpreter.hosted.api_key.as_deref(), Some("g-key"));

        let settings = build_settings(
            dir.path(),
            None,
            vars(&[
                ("GOOGLE_API_KEY", "g-key"),
                ("DASHBOARD__INTERPRETER__HOSTED__API_KEY", "explicit"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.interpreter.hosted.api_key.as_deref(), Some("explicit"));

        let settings = build_settings(dir.path(), None, vars(&[("GOOGLE_API_KEY", "  ")])).unwrap();
        assert!(settings.interpreter.hosted.api_key.is_none());
    }

    #[test]
    fn test_vocabulary_from_file() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "default",
            "interpreter:\n  field_synonyms:\n    - keyword: visits\n      field: sessionsThisMonth\n      dataset: users\n  dataset_keywords:\n    - keyword: customers\n      dataset: users\n",
        );

        let settings = build_settings(dir.path(), None, vars(&[])).unwrap();
        assert_eq!(
            settings.interpreter.field_synonyms,
            vec![FieldSynonymConfig {
                keyword: "visits".to_string(),
                field: "sessionsThisMonth".to_string(),
                dataset: DatasetType::Users,
            }]
        );
        assert_eq!(settings.interpreter.dataset_keywords[0].dataset, DatasetType::Users);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "default", "server:\n  port: 0\n");
        assert!(matches!(
            build_settings(dir.path(), None, vars(&[])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
