//! Prompt construction for hosted interpretation
//!
//! The system message carries the dataset schemas, the component and
//! operator vocabularies and the required output format. The user message is
//! the raw request.

use std::fmt;

use prompt_dashboard_core::schema::schema_prompt;
use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Whether the model should answer with one component or several
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Single,
    Multi,
}

const COMPONENTS: &str = "Available component types:
- chart: For visualizing trends and comparisons (bar, line, or area)
- table: For displaying detailed data in rows and columns
- card: For showing summary statistics and KPIs";

const OPERATORS: &str = "Filter operators:
- gt: greater than
- gte: greater than or equal
- lt: less than
- lte: less than or equal
- eq: equals
- contains: string contains";

const OBJECT_FIELDS: &str = "- componentType: \"chart\", \"table\", or \"card\"
- datasetType: \"sales\", \"users\", or \"products\"
- chartType: \"bar\", \"line\", or \"area\" (only if componentType is \"chart\")
- filters: array of filter objects with field, operator, value (only if user wants filtered data)
- title: A short title for the component
- description: A brief description";

/// Builder for interpretation conversations
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    messages: Vec<Message>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the interpretation instructions for the given mode
    pub fn system_prompt(mut self, mode: PromptMode) -> Self {
        let (task, output) = match mode {
            PromptMode::Single => (
                "Interpret the user's request and determine which UI component, dataset, and filters to apply.",
                format!(
                    "Respond ONLY with a valid JSON object (no markdown, no code blocks, no explanation) containing:\n{}",
                    OBJECT_FIELDS
                ),
            ),
            PromptMode::Multi => (
                "Interpret the user's request and determine which UI components, datasets, and filters to apply.\n\
                 The user may be requesting MULTIPLE components. If so, return MULTIPLE JSON objects (one per line, no array wrapper).",
                format!(
                    "Respond ONLY with valid JSON objects (no markdown, no code blocks, no explanation).\n\
                     If the request is for multiple components/datasets, return one JSON object per line.\n\
                     Each JSON object should contain:\n{}",
                    OBJECT_FIELDS
                ),
            ),
        };

        let system = format!(
            "You are a dashboard AI assistant. {task}\n\n{schemas}\n{COMPONENTS}\n\n{OPERATORS}\n\n{output}",
            schemas = schema_prompt(),
        );

        self.messages.push(Message::system(system));
        self
    }

    pub fn user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    pub fn build(self) -> Vec<Message> {
        self.messages
    }

    /// Full conversation for one request
    pub fn interpretation(mode: PromptMode, request: &str) -> Vec<Message> {
        Self::new()
            .system_prompt(mode)
            .user_message(format!("User request: {}", request))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_prompt() {
        let messages = PromptBuilder::interpretation(PromptMode::Single, "show users");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("## SALES Dataset"));
        assert!(messages[0].content.contains("- contains: string contains"));
        assert!(messages[0].content.contains("a valid JSON object"));
        assert!(!messages[0].content.contains("MULTIPLE"));
        assert_eq!(messages[1], Message::user("User request: show users"));
    }

    #[test]
    fn test_multi_prompt() {
        let messages = PromptBuilder::interpretation(PromptMode::Multi, "users and products");
        assert!(messages[0].content.contains("one JSON object per line"));
        assert!(messages[0].content.contains("## PRODUCTS Dataset"));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
    }
}
