//! Interpretation model
//!
//! An `Interpretation` is the structured query derived from one free-text
//! request: which dataset to read, how to present it, and which
//! filter/sort/limit criteria to apply. It is created fresh per request and
//! never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One of the three fixed record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Sales,
    Users,
    Products,
}

impl DatasetType {
    /// All datasets in declaration order
    pub const ALL: [DatasetType; 3] = [DatasetType::Sales, DatasetType::Users, DatasetType::Products];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Sales => "sales",
            DatasetType::Users => "users",
            DatasetType::Products => "products",
        }
    }

    /// Capitalized name used in generated titles
    pub fn display_name(&self) -> &'static str {
        match self {
            DatasetType::Sales => "Sales",
            DatasetType::Users => "Users",
            DatasetType::Products => "Products",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sales" => Ok(DatasetType::Sales),
            "users" => Ok(DatasetType::Users),
            "products" => Ok(DatasetType::Products),
            other => Err(Error::UnknownDataset(other.to_string())),
        }
    }
}

/// Visual presentation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Chart,
    Table,
    Card,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Chart => "chart",
            ComponentType::Table => "table",
            ComponentType::Card => "card",
        }
    }

    /// Noun appended to generated titles
    pub fn title_noun(&self) -> &'static str {
        match self {
            ComponentType::Chart => "Chart",
            ComponentType::Table => "Data",
            ComponentType::Card => "Summary",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chart" => Ok(ComponentType::Chart),
            "table" => Ok(ComponentType::Table),
            "card" => Ok(ComponentType::Card),
            other => Err(Error::Parse(format!("unknown component type '{}'", other))),
        }
    }
}

/// Chart sub-kind, only meaningful for `ComponentType::Chart`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Area,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "area" => Ok(ChartType::Area),
            other => Err(Error::Parse(format!("unknown chart type '{}'", other))),
        }
    }
}

/// Comparison applied by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
    Contains,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Contains => "contains",
        }
    }

    /// Symbol used when rendering descriptions
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Eq => "=",
            FilterOperator::Neq => "!=",
            FilterOperator::Contains => "contains",
        }
    }

    /// Operators that only make sense against a numeric value
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte
        )
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gt" => Ok(FilterOperator::Gt),
            "gte" => Ok(FilterOperator::Gte),
            "lt" => Ok(FilterOperator::Lt),
            "lte" => Ok(FilterOperator::Lte),
            "eq" => Ok(FilterOperator::Eq),
            "neq" => Ok(FilterOperator::Neq),
            "contains" => Ok(FilterOperator::Contains),
            other => Err(Error::Parse(format!("unknown filter operator '{}'", other))),
        }
    }
}

/// Filter operand: either a number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl FilterValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

/// A single predicate; filters in one interpretation compose as AND
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Canonical field name
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator.symbol(), self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Anything starting with "asc" is ascending, everything else descending
    pub fn from_word(word: &str) -> Self {
        if word.to_lowercase().starts_with("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort directive; at most one per interpretation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Structured query derived from free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretation {
    pub component_type: ComponentType,
    pub dataset_type: DatasetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    pub title: String,
    pub description: String,
}

impl Interpretation {
    /// Filters as a slice; empty when absent
    pub fn filters(&self) -> &[Filter] {
        self.filters.as_deref().unwrap_or(&[])
    }

    /// Check the model invariants
    ///
    /// - `chart_type` is present iff `component_type` is chart
    /// - `filters` is absent or non-empty
    /// - `limit`, if present, is strictly positive
    pub fn validate(&self) -> Result<()> {
        match (self.component_type, self.chart_type) {
            (ComponentType::Chart, None) => {
                return Err(Error::InvalidInterpretation(
                    "chart component requires a chartType".to_string(),
                ))
            }
            (other, Some(_)) if other != ComponentType::Chart => {
                return Err(Error::InvalidInterpretation(format!(
                    "chartType is only valid for charts, got component '{}'",
                    other
                )))
            }
            _ => {}
        }

        if matches!(&self.filters, Some(filters) if filters.is_empty()) {
            return Err(Error::InvalidInterpretation(
                "filters must be omitted rather than empty".to_string(),
            ));
        }

        if self.limit == Some(0) {
            return Err(Error::InvalidInterpretation(
                "limit must be strictly positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Repair a record produced outside the rule-based path so that it
    /// satisfies `validate()`.
    pub fn normalize(mut self) -> Self {
        match self.component_type {
            ComponentType::Chart => {
                self.chart_type.get_or_insert(ChartType::Bar);
            }
            _ => self.chart_type = None,
        }
        if matches!(&self.filters, Some(filters) if filters.is_empty()) {
            self.filters = None;
        }
        if self.limit == Some(0) {
            self.limit = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Interpretation {
        Interpretation {
            component_type: ComponentType::Table,
            dataset_type: DatasetType::Users,
            chart_type: None,
            filters: Some(vec![Filter::new("role", FilterOperator::Eq, "admin")]),
            sort: Some(SortSpec::new("name", SortDirection::Asc)),
            limit: Some(5),
            title: "Top 5 Users (Filtered) Data".to_string(),
            description: "Filtered: role = admin".to_string(),
        }
    }

    #[test]
    fn test_serializes_with_camel_case_and_omits_absent_fields() {
        let mut interpretation = sample();
        interpretation.sort = None;
        let json = serde_json::to_value(&interpretation).unwrap();

        assert_eq!(json["componentType"], "table");
        assert_eq!(json["datasetType"], "users");
        assert_eq!(json["filters"][0]["operator"], "eq");
        assert_eq!(json["filters"][0]["value"], "admin");
        assert!(json.get("chartType").is_none());
        assert!(json.get("sort").is_none());
    }

    #[test]
    fn test_filter_value_untagged() {
        let numeric: Filter =
            serde_json::from_str(r#"{"field":"revenue","operator":"gt","value":1000}"#).unwrap();
        assert_eq!(numeric.value, FilterValue::Number(1000.0));

        let text: Filter =
            serde_json::from_str(r#"{"field":"role","operator":"eq","value":"admin"}"#).unwrap();
        assert_eq!(text.value, FilterValue::Text("admin".to_string()));
    }

    #[test]
    fn test_validate_invariants() {
        assert!(sample().validate().is_ok());

        let mut chart_without_type = sample();
        chart_without_type.component_type = ComponentType::Chart;
        assert!(chart_without_type.validate().is_err());

        let mut table_with_chart_type = sample();
        table_with_chart_type.chart_type = Some(ChartType::Line);
        assert!(table_with_chart_type.validate().is_err());

        let mut empty_filters = sample();
        empty_filters.filters = Some(Vec::new());
        assert!(empty_filters.validate().is_err());

        let mut zero_limit = sample();
        zero_limit.limit = Some(0);
        assert!(zero_limit.validate().is_err());
    }

    #[test]
    fn test_normalize_repairs_invariants() {
        let mut raw = sample();
        raw.component_type = ComponentType::Chart;
        raw.filters = Some(Vec::new());
        raw.limit = Some(0);

        let fixed = raw.normalize();
        assert_eq!(fixed.chart_type, Some(ChartType::Bar));
        assert!(fixed.filters.is_none());
        assert!(fixed.limit.is_none());
        assert!(fixed.validate().is_ok());

        let mut card = sample();
        card.component_type = ComponentType::Card;
        card.chart_type = Some(ChartType::Area);
        assert_eq!(card.normalize().chart_type, None);
    }

    #[test]
    fn test_filter_display_uses_symbols() {
        assert_eq!(Filter::new("price", FilterOperator::Lte, 49.5).to_string(), "price <= 49.5");
        assert_eq!(Filter::new("revenue", FilterOperator::Gt, 1000.0).to_string(), "revenue > 1000");
        assert_eq!(
            Filter::new("name", FilterOperator::Contains, "john").to_string(),
            "name contains john"
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("products".parse::<DatasetType>().unwrap(), DatasetType::Products);
        assert!("orders".parse::<DatasetType>().is_err());
        assert_eq!(SortDirection::from_word("ascending"), SortDirection::Asc);
        assert_eq!(SortDirection::from_word("down"), SortDirection::Desc);
    }
}
