//! Hosted prompt interpretation
//!
//! Features:
//! - Chat backends for OpenAI-compatible endpoints and Ollama, with retries
//! - Prompt construction from the dataset schemas
//! - Response parsing with JSON Schema validation
//! - Two-stage strategy that silently falls back to the rule-based interpreter

pub mod backend;
pub mod factory;
pub mod hosted;
pub mod parse;
pub mod prompt;
pub mod service;

pub use backend::{
    FinishReason, GenerationResult, LlmBackend, LlmConfig, OllamaBackend, OpenAIBackend,
    OpenAIConfig,
};
pub use factory::{create_backend, LlmProvider};
pub use hosted::{FallbackReason, HostedInterpreter};
pub use parse::{parse_multi, parse_single, ParseError};
pub use prompt::{Message, PromptBuilder, PromptMode, Role};
pub use service::{InterpretationService, InterpretationSource, ServiceOutcome};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for prompt_dashboard_core::Error {
    fn from(err: LlmError) -> Self {
        prompt_dashboard_core::Error::Llm(err.to_string())
    }
}
