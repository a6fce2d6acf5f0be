//! Rule-based prompt interpreter
//!
//! Composes the detectors and extractors into complete interpretations.
//! Every path is infallible: any prompt, including the empty string, yields
//! at least one interpretation.

use std::sync::Arc;

use async_trait::async_trait;

use prompt_dashboard_core::{
    ChartType, ComponentType, DatasetType, Interpretation, PromptInterpreter, SortSpec,
};

use crate::detection::{detect_all_datasets, detect_chart_type, detect_component, detect_dataset};
use crate::extraction::{extract_filters, extract_limit, extract_sort};
use crate::lexicon::Lexicon;
use crate::summary::{generate_description, generate_title};

/// Detections shared by every interpretation produced from one prompt
struct Presentation {
    component: ComponentType,
    chart: Option<ChartType>,
    sort: Option<SortSpec>,
    limit: Option<u64>,
}

/// Deterministic keyword and pattern based interpreter
#[derive(Debug, Clone)]
pub struct RuleBasedInterpreter {
    lexicon: Arc<Lexicon>,
}

impl RuleBasedInterpreter {
    /// Interpreter over the standard vocabulary
    pub fn new() -> Self {
        Self::with_lexicon(Lexicon::standard().clone())
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            lexicon: Arc::new(lexicon),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Interpret the prompt against its single most likely dataset
    pub fn interpret(&self, prompt: &str) -> Interpretation {
        let dataset = detect_dataset(prompt, &self.lexicon);
        let presentation = self.presentation(prompt);
        let interpretation = self.assemble(prompt, dataset, &presentation);

        tracing::debug!(
            dataset = %interpretation.dataset_type,
            component = %interpretation.component_type,
            filters = interpretation.filters().len(),
            "Interpreted prompt"
        );
        interpretation
    }

    /// One interpretation per dataset the prompt refers to
    ///
    /// Component, chart type, sort and limit are detected once and shared;
    /// filters are extracted separately for each dataset.
    pub fn interpret_all(&self, prompt: &str) -> Vec<Interpretation> {
        let datasets = detect_all_datasets(prompt, &self.lexicon);
        let presentation = self.presentation(prompt);

        let interpretations: Vec<Interpretation> = datasets
            .into_iter()
            .map(|dataset| self.assemble(prompt, dataset, &presentation))
            .collect();

        tracing::debug!(
            count = interpretations.len(),
            component = %presentation.component,
            "Interpreted prompt for all datasets"
        );
        interpretations
    }

    fn presentation(&self, prompt: &str) -> Presentation {
        let component = detect_component(prompt);
        let chart = (component == ComponentType::Chart)
            .then(|| detect_chart_type(prompt, &self.lexicon));

        Presentation {
            component,
            chart,
            sort: extract_sort(prompt, &self.lexicon),
            // A zero limit means "no limit" downstream, so it is never emitted
            limit: extract_limit(prompt).filter(|limit| *limit > 0),
        }
    }

    fn assemble(
        &self,
        prompt: &str,
        dataset: DatasetType,
        presentation: &Presentation,
    ) -> Interpretation {
        let filters = extract_filters(prompt, dataset, &self.lexicon);

        let mut interpretation = Interpretation {
            component_type: presentation.component,
            dataset_type: dataset,
            chart_type: presentation.chart,
            filters: (!filters.is_empty()).then_some(filters),
            sort: presentation.sort.clone(),
            limit: presentation.limit,
            title: String::new(),
            description: String::new(),
        };
        interpretation.title = generate_title(&interpretation);
        interpretation.description = generate_description(&interpretation);
        interpretation
    }
}

impl Default for RuleBasedInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptInterpreter for RuleBasedInterpreter {
    async fn interpret_all(&self, prompt: &str) -> Vec<Interpretation> {
        RuleBasedInterpreter::interpret_all(self, prompt)
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_dashboard_core::{Filter, FilterOperator, SortDirection};

    #[test]
    fn test_interpret_assembles_everything() {
        let interpreter = RuleBasedInterpreter::new();
        let result = interpreter.interpret("top 5 users where role is admin sorted by name asc");

        assert_eq!(result.dataset_type, DatasetType::Users);
        assert_eq!(result.component_type, ComponentType::Table);
        assert_eq!(result.chart_type, None);
        assert_eq!(
            result.filters,
            Some(vec![Filter::new("role", FilterOperator::Eq, "admin")])
        );
        assert_eq!(result.sort, Some(SortSpec::new("name", SortDirection::Asc)));
        assert_eq!(result.limit, Some(5));
        assert_eq!(result.title, "Top 5 Users (Filtered) Data");
        assert_eq!(
            result.description,
            "Filtered: role = admin • Sorted by name (asc) • Showing top 5 results"
        );
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_is_dropped() {
        let result = RuleBasedInterpreter::new().interpret("top 0 products");
        assert_eq!(result.limit, None);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = Lexicon::default()
            .with_dataset_keyword("customers", DatasetType::Users)
            .with_field_synonym("visits", "sessionsThisMonth", DatasetType::Users);
        let interpreter = RuleBasedInterpreter::with_lexicon(lexicon);

        let result = interpreter.interpret("customers with visits above 30");
        assert_eq!(result.dataset_type, DatasetType::Users);
        assert_eq!(
            result.filters,
            Some(vec![Filter::new("sessionsThisMonth", FilterOperator::Gt, 30.0)])
        );
    }

    #[tokio::test]
    async fn test_prompt_interpreter_trait() {
        let interpreter: Arc<dyn PromptInterpreter> = Arc::new(RuleBasedInterpreter::new());
        let results = interpreter.interpret_all("bar chart of products and users").await;

        assert_eq!(results.len(), 2);
        assert_eq!(interpreter.name(), "rule-based");
    }
}
