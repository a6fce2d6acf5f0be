//! Lexical tables
//!
//! Keyword vocabularies that map prompt words to datasets, canonical field
//! names and chart kinds. Iteration order is significant: several detectors
//! resolve ties by table order, so every table is an ordered `Vec`.
//!
//! The standard vocabulary is built once per process; deployments with
//! extra vocabulary clone it and extend it with `with_field_synonym` and
//! `with_dataset_keyword`.

use once_cell::sync::Lazy;
use prompt_dashboard_core::{ChartType, DatasetType};

/// A user-facing field phrase and the canonical field it refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSynonym {
    /// Lowercase phrase; may contain spaces ("units sold")
    pub keyword: String,
    /// Canonical field name in the dataset
    pub field: String,
    pub dataset: DatasetType,
}

impl FieldSynonym {
    pub fn new(keyword: &str, field: &str, dataset: DatasetType) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            field: field.to_string(),
            dataset,
        }
    }
}

/// Ordered keyword tables shared by all detectors
#[derive(Debug, Clone)]
pub struct Lexicon {
    field_synonyms: Vec<FieldSynonym>,
    dataset_keywords: Vec<(String, DatasetType)>,
    chart_keywords: Vec<(String, ChartType)>,
}

static STANDARD: Lazy<Lexicon> = Lazy::new(Lexicon::build_standard);

impl Lexicon {
    /// Process-wide standard vocabulary
    pub fn standard() -> &'static Lexicon {
        &STANDARD
    }

    fn build_standard() -> Self {
        use DatasetType::{Products, Sales, Users};

        let field_synonyms = [
            ("units sold", "unitsSold", Sales),
            ("unitssold", "unitsSold", Sales),
            ("units", "unitsSold", Sales),
            ("sold", "unitsSold", Sales),
            ("revenue", "revenue", Sales),
            ("profit", "profit", Sales),
            ("month", "month", Sales),
            ("sessions", "sessionsThisMonth", Users),
            ("session", "sessionsThisMonth", Users),
            ("role", "role", Users),
            ("status", "status", Users),
            ("name", "name", Users),
            ("email", "email", Users),
            ("price", "price", Products),
            ("stock", "stock", Products),
            ("rating", "rating", Products),
            ("totalsold", "totalSold", Products),
            ("total sold", "totalSold", Products),
            ("category", "category", Products),
        ]
        .into_iter()
        .map(|(keyword, field, dataset)| FieldSynonym::new(keyword, field, dataset))
        .collect();

        let dataset_keywords = [
            ("sales", Sales),
            ("revenue", Sales),
            ("profit", Sales),
            ("income", Sales),
            ("earnings", Sales),
            ("monthly", Sales),
            ("users", Users),
            ("user", Users),
            ("members", Users),
            ("people", Users),
            ("accounts", Users),
            ("products", Products),
            ("product", Products),
            ("inventory", Products),
            ("items", Products),
        ]
        .into_iter()
        .map(|(keyword, dataset)| (keyword.to_string(), dataset))
        .collect();

        let chart_keywords = [
            ("bar", ChartType::Bar),
            ("column", ChartType::Bar),
            ("line", ChartType::Line),
            ("trend", ChartType::Line),
            ("area", ChartType::Area),
            ("filled", ChartType::Area),
        ]
        .into_iter()
        .map(|(keyword, chart)| (keyword.to_string(), chart))
        .collect();

        Self {
            field_synonyms,
            dataset_keywords,
            chart_keywords,
        }
    }

    /// Add or replace a field synonym. A replaced keyword keeps its table position.
    pub fn with_field_synonym(mut self, keyword: &str, field: &str, dataset: DatasetType) -> Self {
        let synonym = FieldSynonym::new(keyword, field, dataset);
        match self
            .field_synonyms
            .iter_mut()
            .find(|existing| existing.keyword == synonym.keyword)
        {
            Some(existing) => *existing = synonym,
            None => self.field_synonyms.push(synonym),
        }
        self
    }

    /// Add or replace a single-word dataset keyword
    pub fn with_dataset_keyword(mut self, keyword: &str, dataset: DatasetType) -> Self {
        let keyword = keyword.to_lowercase();
        match self.dataset_keywords.iter_mut().find(|(k, _)| *k == keyword) {
            Some(entry) => entry.1 = dataset,
            None => self.dataset_keywords.push((keyword, dataset)),
        }
        self
    }

    pub fn field_synonyms(&self) -> &[FieldSynonym] {
        &self.field_synonyms
    }

    /// Exact-key field lookup
    pub fn field_for_keyword(&self, keyword: &str) -> Option<&FieldSynonym> {
        self.field_synonyms.iter().find(|s| s.keyword == keyword)
    }

    /// First field synonym (table order) whose phrase occurs anywhere in `text`
    pub fn first_field_in(&self, text: &str) -> Option<&FieldSynonym> {
        self.field_synonyms
            .iter()
            .find(|s| text.contains(s.keyword.as_str()))
    }

    /// Dataset named by a single whitespace token
    pub fn dataset_for_token(&self, token: &str) -> Option<DatasetType> {
        self.dataset_keywords
            .iter()
            .find(|(k, _)| k == token)
            .map(|(_, dataset)| *dataset)
    }

    /// Chart kind named by a single whitespace token
    pub fn chart_for_token(&self, token: &str) -> Option<ChartType> {
        self.chart_keywords
            .iter()
            .find(|(k, _)| k == token)
            .map(|(_, chart)| *chart)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard().clone()
    }
}
