//! Model response parsing
//!
//! Models are asked for bare JSON but often wrap it in prose or code fences.
//! Single mode takes everything from the first `{` to the last `}`; multi
//! mode scans for every balanced top-level object. Each candidate is checked
//! against a JSON Schema before it is deserialized, and the result is
//! normalized so it satisfies the `Interpretation` invariants.

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use prompt_dashboard_core::{ChartType, ComponentType, DatasetType, Filter, Interpretation};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Why a response produced no interpretation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("No JSON object in response")]
    NoJson,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Schema mismatch: {0}")]
    Schema(String),
}

/// Shape accepted from the model. Sort and limit are never requested, so
/// they are not part of the schema and are ignored when present.
static SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema = json!({
        "type": "object",
        "required": ["componentType", "datasetType", "title", "description"],
        "properties": {
            "componentType": { "enum": ["chart", "table", "card"] },
            "datasetType": { "enum": ["sales", "users", "products"] },
            "chartType": { "enum": ["bar", "line", "area"] },
            "filters": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["field", "operator", "value"],
                    "properties": {
                        "field": { "type": "string" },
                        "operator": { "enum": ["gt", "gte", "lt", "lte", "eq", "contains"] },
                        "value": { "type": ["string", "number"] }
                    }
                }
            },
            "title": { "type": "string" },
            "description": { "type": "string" }
        }
    });
    JSONSchema::compile(&schema).expect("interpretation schema is valid")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostedRecord {
    component_type: ComponentType,
    dataset_type: DatasetType,
    #[serde(default)]
    chart_type: Option<ChartType>,
    #[serde(default)]
    filters: Option<Vec<Filter>>,
    title: String,
    description: String,
}

impl From<HostedRecord> for Interpretation {
    fn from(record: HostedRecord) -> Self {
        Interpretation {
            component_type: record.component_type,
            dataset_type: record.dataset_type,
            chart_type: record.chart_type,
            filters: record.filters,
            sort: None,
            limit: None,
            title: record.title,
            description: record.description,
        }
        .normalize()
    }
}

/// Validate and convert one candidate object
fn interpret_object(candidate: &str) -> Result<Interpretation, ParseError> {
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    if let Err(errors) = SCHEMA.validate(&value) {
        let message = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        return Err(ParseError::Schema(message));
    }

    let record: HostedRecord =
        serde_json::from_value(value).map_err(|e| ParseError::Schema(e.to_string()))?;
    Ok(record.into())
}

/// Span from the first `{` to the last `}`
fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Every balanced top-level `{...}` object, in order.
///
/// Braces outside an object are ignored, and braces inside JSON strings do
/// not count toward nesting.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if depth == 0 {
            if c == '{' {
                start = i;
                depth = 1;
            }
            continue;
        }

        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    objects.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    objects
}

/// Parse a single-component response
pub fn parse_single(text: &str) -> Result<Interpretation, ParseError> {
    let span = greedy_span(text).ok_or(ParseError::NoJson)?;
    interpret_object(span)
}

/// Parse a multi-component response.
///
/// Invalid objects are dropped individually. When none survive, the error
/// describes the last failure: `InvalidJson` only if no candidate was even
/// syntactically valid.
pub fn parse_multi(text: &str) -> Result<Vec<Interpretation>, ParseError> {
    let candidates = balanced_objects(text);
    if candidates.is_empty() {
        return Err(ParseError::NoJson);
    }

    let mut interpretations = Vec::new();
    let mut schema_error = None;
    let mut json_error = None;

    for candidate in candidates {
        match interpret_object(candidate) {
            Ok(interpretation) => interpretations.push(interpretation),
            Err(e @ ParseError::InvalidJson(_)) => {
                tracing::debug!(error = %e, "Discarding unparseable object");
                json_error = Some(e);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Discarding object that does not match the schema");
                schema_error = Some(e);
            }
        }
    }

    if interpretations.is_empty() {
        return Err(schema_error.or(json_error).unwrap_or(ParseError::NoJson));
    }
    Ok(interpretations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_dashboard_core::{FilterOperator, FilterValue};

    const USERS_TABLE: &str = r#"{"componentType":"table","datasetType":"users","filters":[{"field":"role","operator":"eq","value":"Admin"}],"title":"Admins","description":"Admin users"}"#;

    #[test]
    fn test_single_inside_prose_and_fences() {
        let text = format!("Here you go:\n```json\n{}\n```", USERS_TABLE);
        let result = parse_single(&text).unwrap();
        assert_eq!(result.component_type, ComponentType::Table);
        assert_eq!(result.dataset_type, DatasetType::Users);
        assert_eq!(
            result.filters,
            Some(vec![Filter::new("role", FilterOperator::Eq, "Admin")])
        );
        assert_eq!(result.title, "Admins");
    }

    #[test]
    fn test_single_errors() {
        assert_eq!(parse_single("no json here"), Err(ParseError::NoJson));
        assert_eq!(parse_single("} backwards {"), Err(ParseError::NoJson));
        assert!(matches!(parse_single("{not json}"), Err(ParseError::InvalidJson(_))));
        assert!(matches!(
            parse_single(r#"{"componentType":"pie","datasetType":"sales","title":"t","description":"d"}"#),
            Err(ParseError::Schema(_))
        ));
        // neq is never offered to the model
        assert!(matches!(
            parse_single(r#"{"componentType":"table","datasetType":"users","filters":[{"field":"role","operator":"neq","value":"x"}],"title":"t","description":"d"}"#),
            Err(ParseError::Schema(_))
        ));
    }

    #[test]
    fn test_single_greedy_span_rejects_two_objects() {
        let text = format!("{}\n{}", USERS_TABLE, USERS_TABLE);
        assert!(matches!(parse_single(&text), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_normalizes_records() {
        let chart = parse_single(
            r#"{"componentType":"chart","datasetType":"sales","filters":[],"title":"t","description":"d"}"#,
        )
        .unwrap();
        assert_eq!(chart.chart_type, Some(ChartType::Bar));
        assert!(chart.filters.is_none());

        let card = parse_single(
            r#"{"componentType":"card","datasetType":"sales","chartType":"line","title":"t","description":"d","limit":0,"sort":{"field":"x"}}"#,
        )
        .unwrap();
        assert_eq!(card.chart_type, None);
        assert!(card.limit.is_none());
        assert!(card.sort.is_none());
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_numeric_filter_value() {
        let result = parse_single(
            r#"{"componentType":"table","datasetType":"products","filters":[{"field":"price","operator":"lt","value":50}],"title":"t","description":"d"}"#,
        )
        .unwrap();
        assert_eq!(result.filters.unwrap()[0].value, FilterValue::Number(50.0));
    }

    #[test]
    fn test_multi_objects_per_line() {
        let text = format!(
            "{}\n{{\"componentType\":\"chart\",\"datasetType\":\"sales\",\"chartType\":\"line\",\"title\":\"Revenue {{trend}}\",\"description\":\"d\"}}",
            USERS_TABLE
        );
        let results = parse_multi(&text).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].chart_type, Some(ChartType::Line));
        assert_eq!(results[1].title, "Revenue {trend}");
    }

    #[test]
    fn test_multi_discards_invalid_objects() {
        let text = format!("}} stray {{\"componentType\":\"graph\"}} {} {{broken", USERS_TABLE);
        let results = parse_multi(&text).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].dataset_type, DatasetType::Users);
    }

    #[test]
    fn test_multi_errors() {
        assert_eq!(parse_multi("nothing"), Err(ParseError::NoJson));
        assert!(matches!(parse_multi("{a} {b}"), Err(ParseError::InvalidJson(_))));
        assert!(matches!(
            parse_multi(r#"{"a":1} {oops}"#),
            Err(ParseError::Schema(_))
        ));
    }

    #[test]
    fn test_balanced_objects_nested() {
        let objects = balanced_objects(r#"x {"a":{"b":"}"}} y {"c":1}"#);
        assert_eq!(objects, vec![r#"{"a":{"b":"}"}}"#, r#"{"c":1}"#]);
    }
}
