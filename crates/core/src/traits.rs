//! Pluggable interpreter seam
//!
//! The HTTP layer only needs "prompt in, interpretations out". Both the
//! deterministic rule-based interpreter and the hosted-service strategy
//! implement this trait so they can be swapped at startup or in tests.

use async_trait::async_trait;

use crate::Interpretation;

/// Turns a free-text request into one interpretation per requested dataset
#[async_trait]
pub trait PromptInterpreter: Send + Sync {
    /// Interpret a prompt. Never fails and never returns an empty vector.
    async fn interpret_all(&self, prompt: &str) -> Vec<Interpretation>;

    /// Short name used in logs and metrics
    fn name(&self) -> &str;
}
