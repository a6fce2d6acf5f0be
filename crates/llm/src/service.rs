//! Two-stage interpretation strategy
//!
//! The hosted interpreter is tried first. Any failure is logged and counted,
//! then the rule-based interpreter answers instead, so callers always get at
//! least one interpretation and never see an error.

use async_trait::async_trait;
use prompt_dashboard_core::{Interpretation, PromptInterpreter};
use prompt_dashboard_interpreter::RuleBasedInterpreter;

use crate::hosted::{FallbackReason, HostedInterpreter};

/// Which stage produced a result
#[derive(Debug, Clone, PartialEq)]
pub enum InterpretationSource {
    Hosted,
    RuleBased { reason: FallbackReason },
}

impl InterpretationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpretationSource::Hosted => "hosted",
            InterpretationSource::RuleBased { .. } => "rule_based",
        }
    }
}

/// Result of one service call with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOutcome<T> {
    pub result: T,
    pub source: InterpretationSource,
}

/// Hosted interpretation with silent rule-based fallback
#[derive(Debug, Clone)]
pub struct InterpretationService {
    hosted: HostedInterpreter,
    rules: RuleBasedInterpreter,
}

impl InterpretationService {
    pub fn new(hosted: HostedInterpreter, rules: RuleBasedInterpreter) -> Self {
        Self { hosted, rules }
    }

    /// Service that never calls a hosted model
    pub fn rule_based(rules: RuleBasedInterpreter) -> Self {
        Self::new(HostedInterpreter::disabled(), rules)
    }

    pub fn hosted(&self) -> &HostedInterpreter {
        &self.hosted
    }

    pub fn rules(&self) -> &RuleBasedInterpreter {
        &self.rules
    }

    /// Interpret a prompt as a single component
    pub async fn interpret(&self, prompt: &str) -> ServiceOutcome<Interpretation> {
        match self.hosted.interpret(prompt).await {
            Ok(interpretation) => Self::hosted_outcome(interpretation),
            Err(reason) => {
                let source = Self::fall_back(reason);
                ServiceOutcome {
                    result: self.rules.interpret(prompt),
                    source,
                }
            }
        }
    }

    /// Interpret a prompt as one or more components
    pub async fn interpret_many(&self, prompt: &str) -> ServiceOutcome<Vec<Interpretation>> {
        match self.hosted.interpret_all(prompt).await {
            Ok(interpretations) => {
                tracing::debug!(count = interpretations.len(), "Hosted interpretation succeeded");
                Self::hosted_outcome(interpretations)
            }
            Err(reason) => {
                let source = Self::fall_back(reason);
                ServiceOutcome {
                    result: self.rules.interpret_all(prompt),
                    source,
                }
            }
        }
    }

    fn hosted_outcome<T>(result: T) -> ServiceOutcome<T> {
        metrics::counter!("dashboard_interpretations_total", "source" => "hosted").increment(1);
        ServiceOutcome {
            result,
            source: InterpretationSource::Hosted,
        }
    }

    fn fall_back(reason: FallbackReason) -> InterpretationSource {
        if reason == FallbackReason::Disabled {
            tracing::debug!("Hosted interpretation disabled, using rule-based interpreter");
        } else {
            tracing::warn!(
                reason = reason.as_str(),
                error = %reason,
                "Hosted interpretation failed, falling back to rule-based interpreter"
            );
        }

        metrics::counter!("dashboard_fallbacks_total", "reason" => reason.as_str()).increment(1);
        metrics::counter!("dashboard_interpretations_total", "source" => "rule_based").increment(1);
        InterpretationSource::RuleBased { reason }
    }
}

#[async_trait]
impl PromptInterpreter for InterpretationService {
    async fn interpret_all(&self, prompt: &str) -> Vec<Interpretation> {
        self.interpret_many(prompt).await.result
    }

    fn name(&self) -> &str {
        if self.hosted.is_enabled() {
            "hosted"
        } else {
            "rule-based"
        }
    }
}
