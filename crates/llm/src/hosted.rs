//! Hosted interpretation
//!
//! Sends the request to a chat backend under an overall deadline and parses
//! the reply. Every way this can go wrong is reported as a `FallbackReason`
//! so the caller can switch to the rule-based interpreter.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use prompt_dashboard_config::HostedConfig;
use prompt_dashboard_core::Interpretation;

use crate::backend::LlmBackend;
use crate::factory::create_backend;
use crate::parse::{parse_multi, parse_single, ParseError};
use crate::prompt::{PromptBuilder, PromptMode};
use crate::LlmError;

/// Why the hosted service produced nothing usable
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// No backend configured (disabled, or no API key)
    Disabled,
    /// The overall deadline elapsed
    Timeout,
    /// Network or API error after retries
    Transport(String),
    /// No JSON object in the reply, or the JSON did not parse
    MalformedResponse(String),
    /// JSON was found but no object matched the interpretation schema
    SchemaMismatch(String),
}

impl FallbackReason {
    /// Stable label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::Disabled => "disabled",
            FallbackReason::Timeout => "timeout",
            FallbackReason::Transport(_) => "transport",
            FallbackReason::MalformedResponse(_) => "malformed_response",
            FallbackReason::SchemaMismatch(_) => "schema_mismatch",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Disabled => write!(f, "hosted interpretation disabled"),
            FallbackReason::Timeout => write!(f, "hosted interpretation timed out"),
            FallbackReason::Transport(e) => write!(f, "transport error: {}", e),
            FallbackReason::MalformedResponse(e) => write!(f, "malformed response: {}", e),
            FallbackReason::SchemaMismatch(e) => write!(f, "schema mismatch: {}", e),
        }
    }
}

impl From<LlmError> for FallbackReason {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => FallbackReason::Timeout,
            LlmError::InvalidResponse(e) => FallbackReason::MalformedResponse(e),
            LlmError::Configuration(_) => FallbackReason::Disabled,
            other => FallbackReason::Transport(other.to_string()),
        }
    }
}

impl From<ParseError> for FallbackReason {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NoJson | ParseError::InvalidJson(_) => {
                FallbackReason::MalformedResponse(err.to_string())
            }
            ParseError::Schema(e) => FallbackReason::SchemaMismatch(e),
        }
    }
}

/// Interpreter backed by a hosted language model
#[derive(Clone)]
pub struct HostedInterpreter {
    backend: Option<Arc<dyn LlmBackend>>,
    timeout: Duration,
}

impl HostedInterpreter {
    pub fn new(backend: Arc<dyn LlmBackend>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
        }
    }

    /// Interpreter that always reports `FallbackReason::Disabled`
    pub fn disabled() -> Self {
        Self {
            backend: None,
            timeout: Duration::ZERO,
        }
    }

    /// Build from configuration. A disabled service or a backend that cannot
    /// be created (missing API key) yields a disabled interpreter.
    pub fn from_config(config: &HostedConfig) -> Self {
        if !config.enabled {
            tracing::info!("Hosted interpretation disabled in configuration");
            return Self::disabled();
        }

        match create_backend(config) {
            Ok(backend) => {
                tracing::info!(
                    provider = %config.provider,
                    model = backend.model_name(),
                    timeout_ms = config.timeout_ms,
                    "Hosted interpretation enabled"
                );
                Self::new(backend, Duration::from_millis(config.timeout_ms))
            }
            Err(e) => {
                tracing::info!(error = %e, "Hosted interpretation unavailable, using rule-based only");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&Arc<dyn LlmBackend>> {
        self.backend.as_ref()
    }

    /// Whether the configured backend currently answers
    pub async fn is_available(&self) -> bool {
        match &self.backend {
            Some(backend) => backend.is_available().await,
            None => false,
        }
    }

    async fn complete(&self, mode: PromptMode, prompt: &str) -> Result<String, FallbackReason> {
        let backend = self.backend.as_ref().ok_or(FallbackReason::Disabled)?;
        let messages = PromptBuilder::interpretation(mode, prompt);

        let result = tokio::time::timeout(self.timeout, backend.generate(&messages))
            .await
            .map_err(|_| FallbackReason::Timeout)??;

        tracing::debug!(
            model = backend.model_name(),
            tokens = result.tokens,
            total_time_ms = result.total_time_ms,
            "Hosted model responded"
        );
        Ok(result.text)
    }

    /// One interpretation for the prompt
    pub async fn interpret(&self, prompt: &str) -> Result<Interpretation, FallbackReason> {
        let text = self.complete(PromptMode::Single, prompt).await?;
        Ok(parse_single(&text)?)
    }

    /// One interpretation per requested component
    pub async fn interpret_all(&self, prompt: &str) -> Result<Vec<Interpretation>, FallbackReason> {
        let text = self.complete(PromptMode::Multi, prompt).await?;
        Ok(parse_multi(&text)?)
    }
}

impl fmt::Debug for HostedInterpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedInterpreter")
            .field("model", &self.backend.as_ref().map(|b| b.model_name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
