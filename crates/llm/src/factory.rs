//! Backend factory
//!
//! Creates the hosted interpretation backend from `HostedConfig`.
//!
//! ## Supported Providers
//! - **openai**: any OpenAI-compatible endpoint, Google's Gemini endpoint by default
//! - **ollama**: local models

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use prompt_dashboard_config::HostedConfig;

use crate::backend::{LlmBackend, LlmConfig, OllamaBackend, OpenAIBackend, OpenAIConfig};
use crate::LlmError;

/// LLM provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions
    #[default]
    OpenAI,
    /// Local Ollama server
    Ollama,
}

impl FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "gemini" => Ok(LlmProvider::OpenAI),
            "ollama" | "local" => Ok(LlmProvider::Ollama),
            other => Err(LlmError::Configuration(format!("Unknown provider: {}", other))),
        }
    }
}

/// Build a backend for the configured provider.
///
/// Fails with `LlmError::Configuration` when the provider is unknown or a
/// remote provider has no API key.
pub fn create_backend(config: &HostedConfig) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let timeout = Duration::from_millis(config.timeout_ms);

    match config.provider.parse::<LlmProvider>()? {
        LlmProvider::OpenAI => {
            let mut openai = OpenAIConfig {
                model: config.model.clone(),
                max_tokens: config.max_tokens as usize,
                temperature: config.temperature,
                timeout,
                max_retries: config.max_retries,
                ..Default::default()
            };
            if let Some(endpoint) = &config.endpoint {
                openai.endpoint = endpoint.clone();
            }
            if let Some(key) = &config.api_key {
                openai.api_key = key.clone();
            }
            Ok(Arc::new(OpenAIBackend::new(openai)?))
        }
        LlmProvider::Ollama => {
            let mut ollama = LlmConfig {
                model: config.model.clone(),
                max_tokens: config.max_tokens as usize,
                temperature: config.temperature,
                timeout,
                max_retries: config.max_retries,
                ..Default::default()
            };
            if let Some(endpoint) = &config.endpoint {
                ollama.endpoint = endpoint.clone();
            }
            Ok(Arc::new(OllamaBackend::new(ollama)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert_eq!("ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert!("claude".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_openai_without_key_is_rejected() {
        let config = HostedConfig::default();
        assert!(matches!(create_backend(&config), Err(LlmError::Configuration(_))));
    }

    #[test]
    fn test_create_backends() {
        let config = HostedConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.model_name(), "gemini-2.5-flash-lite");

        let config = HostedConfig {
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            ..Default::default()
        };
        assert_eq!(create_backend(&config).unwrap().model_name(), "llama3.2");
    }
}
