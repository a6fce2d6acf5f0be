//! Query engine
//!
//! Executes a [`DataQuery`] against the static datasets: filters are ANDed,
//! then the optional sort is applied, then the row limit.
//!
//! ## Filter semantics
//!
//! - a filter on a field the record lacks (or holds null) passes
//! - a numeric operand (a number, or text that reads as one) compares
//!   numerically against the record value's numeric prefix; a record value
//!   with no numeric reading passes
//! - otherwise values compare as lowercase text (eq, neq, contains)
//! - operator/operand combinations with no meaning pass
//!
//! ## Sort semantics
//!
//! Numbers compare numerically, everything else as lowercase text. Missing
//! values sort last when ascending and first when descending. The sort is
//! stable.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use prompt_dashboard_core::{
    DatasetType, Filter, FilterOperator, FilterValue, Interpretation, SortDirection, SortSpec,
};

use crate::store::{DatasetStore, Record};
use crate::summary::DatasetSummary;
use crate::value::{is_numeric_text, parse_float_prefix, parse_int_prefix, value_as_number, value_as_text};
use crate::{DataError, Result};

/// Raw query-string parameters of a data request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    #[serde(rename = "type")]
    pub dataset: Option<String>,
    /// JSON array of filters
    pub filters: Option<String>,
    /// JSON sort object
    pub sort: Option<String>,
    pub limit: Option<String>,
}

/// Selection criteria over one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DataQuery {
    pub dataset: DatasetType,
    pub filters: Vec<Filter>,
    pub sort: Option<SortSpec>,
    /// Zero or negative means unlimited
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
struct RawSort {
    field: Option<String>,
    direction: Option<String>,
}

impl DataQuery {
    pub fn new(dataset: DatasetType) -> Self {
        Self {
            dataset,
            filters: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    pub fn from_interpretation(interpretation: &Interpretation) -> Self {
        Self {
            dataset: interpretation.dataset_type,
            filters: interpretation.filters().to_vec(),
            sort: interpretation.sort.clone(),
            limit: interpretation
                .limit
                .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX)),
        }
    }

    /// Parse request parameters
    ///
    /// Only the dataset name is mandatory. Malformed `filters` or `sort`
    /// JSON is logged and treated as absent; individual filters that do not
    /// parse are skipped.
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        let name = params.dataset.as_deref().unwrap_or_default();
        let dataset: DatasetType = name
            .parse()
            .map_err(|_| DataError::UnknownDataset(name.to_string()))?;

        Ok(Self {
            dataset,
            filters: params.filters.as_deref().map(parse_filters).unwrap_or_default(),
            sort: params.sort.as_deref().and_then(parse_sort),
            limit: params.limit.as_deref().and_then(parse_int_prefix),
        })
    }
}

fn parse_filters(json: &str) -> Vec<Filter> {
    let items: Vec<Value> = match serde_json::from_str(json) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse filters, ignoring");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Filter>(item) {
            Ok(filter) => Some(filter),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed filter");
                None
            }
        })
        .collect()
}

fn parse_sort(json: &str) -> Option<SortSpec> {
    let raw: RawSort = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse sort, ignoring");
            return None;
        }
    };

    let field = raw.field.filter(|f| !f.is_empty())?;
    let direction = match raw.direction.as_deref() {
        Some("asc") => SortDirection::Asc,
        _ => SortDirection::Desc,
    };
    Some(SortSpec::new(field, direction))
}

/// Executes queries against a shared dataset store
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: Arc<DatasetStore>,
}

impl QueryEngine {
    pub fn new(store: DatasetStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Matching records in result order
    pub fn execute(&self, query: &DataQuery) -> Vec<Record> {
        let mut rows: Vec<Record> = self
            .store
            .records(query.dataset)
            .iter()
            .filter(|record| query.filters.iter().all(|filter| matches(record, filter)))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            rows.sort_by(|a, b| compare(a, b, sort));
        }

        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        tracing::debug!(
            dataset = %query.dataset,
            filters = query.filters.len(),
            rows = rows.len(),
            "Executed data query"
        );
        rows
    }

    /// Summary statistics of a whole dataset
    pub fn summary(&self, dataset: DatasetType) -> Result<DatasetSummary> {
        DatasetSummary::compute(&self.store, dataset)
    }
}

fn present<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}

/// Whether `record` satisfies `filter`
pub fn matches(record: &Record, filter: &Filter) -> bool {
    let Some(actual) = present(record, &filter.field) else {
        return true;
    };

    let operand = match &filter.value {
        FilterValue::Number(n) => Some(*n),
        FilterValue::Text(text) if is_numeric_text(text) => {
            Some(parse_float_prefix(text).unwrap_or(f64::NAN))
        }
        FilterValue::Text(_) => None,
    };

    if let Some(operand) = operand {
        let Some(actual) = value_as_number(actual) else {
            return true;
        };
        return match filter.operator {
            FilterOperator::Gt => actual > operand,
            FilterOperator::Gte => actual >= operand,
            FilterOperator::Lt => actual < operand,
            FilterOperator::Lte => actual <= operand,
            FilterOperator::Eq => actual == operand,
            FilterOperator::Neq => actual != operand,
            FilterOperator::Contains => true,
        };
    }

    let actual = value_as_text(actual).to_lowercase();
    let expected = filter.value.to_string().to_lowercase();
    match filter.operator {
        FilterOperator::Eq => actual == expected,
        FilterOperator::Neq => actual != expected,
        FilterOperator::Contains => actual.contains(&expected),
        _ => true,
    }
}

/// Sort order for two records.
///
/// Text uses case-insensitive code point order rather than a locale
/// collation, so accented and non-Latin names may not sort as a browser's
/// `localeCompare` would. The bundled datasets are ASCII.
fn compare(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    let ordering = match (present(a, &sort.field), present(b, &sort.field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => value_as_text(x)
            .to_lowercase()
            .cmp(&value_as_text(y).to_lowercase()),
    };

    match sort.direction {
        SortDirection::Asc => ordering,
        // Missing values lead when descending
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_missing_field_passes() {
        let row = record(json!({"name": "Webcam"}));
        assert!(matches(&row, &Filter::new("price", FilterOperator::Gt, 100.0)));
        let row = record(json!({"price": null}));
        assert!(matches(&row, &Filter::new("price", FilterOperator::Gt, 100.0)));
    }

    #[test]
    fn test_numeric_comparisons() {
        let row = record(json!({"price": 49.5}));
        assert!(matches(&row, &Filter::new("price", FilterOperator::Lt, 50.0)));
        assert!(matches(&row, &Filter::new("price", FilterOperator::Lte, 49.5)));
        assert!(!matches(&row, &Filter::new("price", FilterOperator::Gt, 49.5)));
        assert!(matches(&row, &Filter::new("price", FilterOperator::Gte, 49.5)));
        assert!(matches(&row, &Filter::new("price", FilterOperator::Eq, 49.5)));
        assert!(matches(&row, &Filter::new("price", FilterOperator::Neq, 10.0)));
        // No numeric meaning for contains
        assert!(matches(&row, &Filter::new("price", FilterOperator::Contains, 7.0)));
    }

    #[test]
    fn test_numeric_text_operand() {
        let row = record(json!({"revenue": 45000}));
        assert!(matches(&row, &Filter::new("revenue", FilterOperator::Gt, "1000")));
        assert!(!matches(&row, &Filter::new("revenue", FilterOperator::Lt, " 1000 ")));
    }

    #[test]
    fn test_record_value_numeric_prefix() {
        let row = record(json!({"lastActive": "2024-12-18T09:24:00Z"}));
        assert!(matches(&row, &Filter::new("lastActive", FilterOperator::Gte, 2024.0)));
        assert!(!matches(&row, &Filter::new("lastActive", FilterOperator::Gt, 2024.0)));

        // Non-numeric record values skip numeric filters
        let row = record(json!({"month": "Jan"}));
        assert!(matches(&row, &Filter::new("month", FilterOperator::Gt, 5.0)));
    }

    #[test]
    fn test_text_comparisons_ignore_case() {
        let row = record(json!({"role": "Admin", "email": "John@Example.com"}));
        assert!(matches(&row, &Filter::new("role", FilterOperator::Eq, "admin")));
        assert!(!matches(&row, &Filter::new("role", FilterOperator::Neq, "ADMIN")));
        assert!(matches(&row, &Filter::new("email", FilterOperator::Contains, "example")));
        assert!(!matches(&row, &Filter::new("email", FilterOperator::Contains, "gmail")));
        // Ordering operators have no text meaning
        assert!(matches(&row, &Filter::new("role", FilterOperator::Gt, "viewer")));
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let asc = SortSpec::new("name", SortDirection::Asc);
        let apple = record(json!({"name": "apple"}));
        let banana = record(json!({"name": "Banana"}));
        let zebra = record(json!({"name": "zebra"}));

        assert_eq!(compare(&apple, &banana, &asc), Ordering::Less);
        assert_eq!(compare(&banana, &zebra, &asc), Ordering::Less);
        assert_eq!(
            compare(&record(json!({"name": "Apple"})), &apple, &asc),
            Ordering::Equal
        );
        let desc = SortSpec::new("name", SortDirection::Desc);
        assert_eq!(compare(&apple, &banana, &desc), Ordering::Greater);
    }

    #[test]
    fn test_parse_params() {
        let params = QueryParams {
            dataset: Some("products".to_string()),
            filters: Some(r#"[{"field":"price","operator":"lt","value":50},{"bogus":true}]"#.to_string()),
            sort: Some(r#"{"field":"rating","direction":"asc"}"#.to_string()),
            limit: Some("3".to_string()),
        };
        let query = DataQuery::from_params(&params).unwrap();
        assert_eq!(query.dataset, DatasetType::Products);
        assert_eq!(query.filters, vec![Filter::new("price", FilterOperator::Lt, 50.0)]);
        assert_eq!(query.sort, Some(SortSpec::new("rating", SortDirection::Asc)));
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn test_parse_params_tolerates_garbage() {
        let params = QueryParams {
            dataset: Some("users".to_string()),
            filters: Some("not json".to_string()),
            sort: Some("{broken".to_string()),
            limit: Some("many".to_string()),
        };
        let query = DataQuery::from_params(&params).unwrap();
        assert!(query.filters.is_empty());
        assert!(query.sort.is_none());
        assert!(query.limit.is_none());

        let params = QueryParams {
            dataset: Some("users".to_string()),
            sort: Some(r#"{"field":"name","direction":"up"}"#.to_string()),
            ..Default::default()
        };
        let query = DataQuery::from_params(&params).unwrap();
        assert_eq!(query.sort, Some(SortSpec::new("name", SortDirection::Desc)));
    }

    #[test]
    fn test_parse_params_rejects_unknown_dataset() {
        let params = QueryParams {
            dataset: Some("orders".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            DataQuery::from_params(&params),
            Err(DataError::UnknownDataset(name)) if name == "orders"
        ));
        assert!(DataQuery::from_params(&QueryParams::default()).is_err());
    }
}
