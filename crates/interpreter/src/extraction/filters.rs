//! Filter extraction
//!
//! Three passes over the lowercased prompt, in output order:
//! 1. numeric comparisons, each attached to the nearest preceding field keyword
//! 2. `<field> is <word>` / `<field> contains <word>` assertions over a fixed field list
//! 3. dataset-specific status shorthands ("active", "in stock", ...)

use once_cell::sync::Lazy;
use regex::Regex;

use prompt_dashboard_core::{DatasetType, Filter, FilterOperator};

use crate::lexicon::{FieldSynonym, Lexicon};

/// Characters scanned before a numeric match when looking for its field
const FIELD_WINDOW_CHARS: usize = 50;

const NUMBER: &str = r"([0-9]+(?:\.[0-9]+)?)";

// =============================================================================
// STATIC REGEX PATTERNS
// =============================================================================

fn numeric(template: &str) -> Regex {
    Regex::new(&template.replace("{n}", NUMBER)).unwrap()
}

// Every pattern is tried on its own; each one that matches may emit a filter
static NUMERIC_PATTERNS: Lazy<Vec<(FilterOperator, Vec<Regex>)>> = Lazy::new(|| {
    vec![
        (
            FilterOperator::Gt,
            vec![
                numeric(r"above\s+{n}"),
                numeric(r"greater\s+than\s+{n}"),
                numeric(r"more\s+than\s+{n}"),
                numeric(r">\s*{n}"),
                numeric(r"over\s+{n}"),
                numeric(r"exceeds?\s+{n}"),
            ],
        ),
        (
            FilterOperator::Gte,
            vec![
                numeric(r"at\s+least\s+{n}"),
                numeric(r">=\s*{n}"),
                numeric(r"minimum\s+{n}"),
                numeric(r"{n}\s+or\s+more"),
            ],
        ),
        (
            FilterOperator::Lt,
            vec![
                numeric(r"below\s+{n}"),
                numeric(r"less\s+than\s+{n}"),
                numeric(r"under\s+{n}"),
                numeric(r"<\s*{n}"),
                numeric(r"fewer\s+than\s+{n}"),
            ],
        ),
        (
            FilterOperator::Lte,
            vec![
                numeric(r"at\s+most\s+{n}"),
                numeric(r"<=\s*{n}"),
                numeric(r"maximum\s+{n}"),
                numeric(r"{n}\s+or\s+less"),
                numeric(r"up\s+to\s+{n}"),
            ],
        ),
        (
            FilterOperator::Eq,
            vec![
                numeric(r"equals?\s+{n}"),
                numeric(r"equal\s+to\s+{n}"),
                numeric(r"=\s*{n}"),
                numeric(r"exactly\s+{n}"),
                numeric(r"is\s+{n}"),
            ],
        ),
    ]
});

/// Fields accepted by the string assertion pass, in output order
const STRING_FIELDS: &[&str] = &[
    "name", "email", "status", "role", "category", "price", "stock", "rating", "totalSold",
];

struct StringFieldPatterns {
    field: &'static str,
    equals: Regex,
    contains: Regex,
}

static STRING_PATTERNS: Lazy<Vec<StringFieldPatterns>> = Lazy::new(|| {
    STRING_FIELDS
        .iter()
        .map(|&field| {
            let name = regex::escape(field);
            StringFieldPatterns {
                field,
                equals: Regex::new(&format!(
                    r#"(?i){name}\s+(?:is|=|equals?)\s+["']?([0-9A-Za-z_]+)["']?"#
                ))
                .unwrap(),
                contains: Regex::new(&format!(
                    r#"(?i){name}\s+contains\s+["']?([0-9A-Za-z_]+)["']?"#
                ))
                .unwrap(),
            }
        })
        .collect()
});

static ACTIVE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bactive\b").unwrap());
static ACTIVE_SUBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"active\s+(?:users?|members?|accounts?)").unwrap());

// Checked in order; only the first hit applies
static STOCK_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"\bin[\s-]?stock\b").unwrap(), "in_stock"),
        (Regex::new(r"\bout[\s-]?of[\s-]?stock\b").unwrap(), "out_of_stock"),
        (Regex::new(r"\blow[\s-]?stock\b").unwrap(), "low_stock"),
    ]
});

// =============================================================================
// EXTRACTION
// =============================================================================

/// Extract every filter the prompt expresses for `dataset`
pub fn extract_filters(prompt: &str, dataset: DatasetType, lexicon: &Lexicon) -> Vec<Filter> {
    let lower = prompt.to_lowercase();
    let mut filters = numeric_filters(&lower, lexicon);
    filters.extend(string_filters(&lower));
    if let Some(shorthand) = status_shorthand(&lower, dataset, &filters) {
        filters.push(shorthand);
    }
    filters
}

fn numeric_filters(lower: &str, lexicon: &Lexicon) -> Vec<Filter> {
    let mut filters = Vec::new();
    for (operator, patterns) in NUMERIC_PATTERNS.iter() {
        for pattern in patterns {
            let Some(caps) = pattern.captures(lower) else {
                continue;
            };
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(value) = number.as_str().parse::<f64>() else {
                continue;
            };
            match nearest_field(&lower[..whole.start()], lexicon) {
                Some(synonym) => filters.push(Filter::new(synonym.field.clone(), *operator, value)),
                None => tracing::trace!(
                    operator = %operator,
                    value,
                    "Numeric comparison without a preceding field, skipped"
                ),
            }
        }
    }
    filters
}

/// Field keyword closest to the end of `head`, searched in its trailing window
///
/// Closest means the highest last-occurrence position; on a tie the keyword
/// listed first in the lexicon wins.
pub fn nearest_field<'a>(head: &str, lexicon: &'a Lexicon) -> Option<&'a FieldSynonym> {
    let start = head
        .char_indices()
        .rev()
        .nth(FIELD_WINDOW_CHARS - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let window = &head[start..];

    let mut best: Option<(usize, &FieldSynonym)> = None;
    for synonym in lexicon.field_synonyms() {
        if let Some(pos) = window.rfind(synonym.keyword.as_str()) {
            if best.map_or(true, |(best_pos, _)| pos > best_pos) {
                best = Some((pos, synonym));
            }
        }
    }
    best.map(|(_, synonym)| synonym)
}

fn string_filters(lower: &str) -> Vec<Filter> {
    let mut filters = Vec::new();
    for patterns in STRING_PATTERNS.iter() {
        if let Some(value) = patterns.equals.captures(lower).and_then(|c| c.get(1)) {
            filters.push(Filter::new(patterns.field, FilterOperator::Eq, value.as_str()));
        }
        if let Some(value) = patterns.contains.captures(lower).and_then(|c| c.get(1)) {
            filters.push(Filter::new(patterns.field, FilterOperator::Contains, value.as_str()));
        }
    }
    filters
}

fn status_shorthand(lower: &str, dataset: DatasetType, existing: &[Filter]) -> Option<Filter> {
    match dataset {
        DatasetType::Users => {
            let has_status = existing.iter().any(|f| f.field == "status");
            // "active users" names the subject rather than filtering it
            (!has_status && ACTIVE_WORD.is_match(lower) && !ACTIVE_SUBJECT.is_match(lower))
                .then(|| Filter::new("status", FilterOperator::Eq, "active"))
        }
        DatasetType::Products => STOCK_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(lower))
            .map(|(_, status)| Filter::new("status", FilterOperator::Eq, *status)),
        DatasetType::Sales => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_dashboard_core::FilterValue;

    fn filters(prompt: &str, dataset: DatasetType) -> Vec<Filter> {
        extract_filters(prompt, dataset, Lexicon::standard())
    }

    #[test]
    fn test_numeric_filter_uses_nearest_field() {
        let result = filters("products price below 100 and stock above 50", DatasetType::Products);
        assert_eq!(
            result,
            vec![
                Filter::new("stock", FilterOperator::Gt, 50.0),
                Filter::new("price", FilterOperator::Lt, 100.0),
            ]
        );
    }

    #[test]
    fn test_multi_word_keyword_resolves_by_position() {
        let result = filters("sales units sold below 500", DatasetType::Sales);
        assert_eq!(result, vec![Filter::new("unitsSold", FilterOperator::Lt, 500.0)]);
    }

    #[test]
    fn test_numeric_without_field_is_dropped() {
        assert!(filters("show everything above 1000", DatasetType::Sales).is_empty());
    }

    #[test]
    fn test_window_is_bounded() {
        let prompt = format!("revenue {} above 10", "x".repeat(60));
        assert!(filters(&prompt, DatasetType::Sales).is_empty());
    }

    #[test]
    fn test_window_counts_characters() {
        let prompt = format!("revenue {}above 10", "é".repeat(40));
        let result = filters(&prompt, DatasetType::Sales);
        assert_eq!(result, vec![Filter::new("revenue", FilterOperator::Gt, 10.0)]);
    }

    #[test]
    fn test_every_matching_pattern_emits() {
        // "over 20" (gt) and "at least 5" (gte) are independent patterns
        let result = filters("sessions over 20 and rating at least 5", DatasetType::Users);
        assert_eq!(
            result,
            vec![
                Filter::new("sessionsThisMonth", FilterOperator::Gt, 20.0),
                Filter::new("rating", FilterOperator::Gte, 5.0),
            ]
        );
    }

    #[test]
    fn test_decimal_value() {
        let result = filters("products rating greater than 4.5", DatasetType::Products);
        assert_eq!(result[0].value, FilterValue::Number(4.5));
    }

    #[test]
    fn test_string_filters_follow_field_order() {
        let result = filters("users name contains john and role is admin", DatasetType::Users);
        assert_eq!(
            result,
            vec![
                Filter::new("name", FilterOperator::Contains, "john"),
                Filter::new("role", FilterOperator::Eq, "admin"),
            ]
        );
    }

    #[test]
    fn test_string_filters_are_not_scoped_to_dataset() {
        let result = filters("users where price is cheap", DatasetType::Users);
        assert_eq!(result, vec![Filter::new("price", FilterOperator::Eq, "cheap")]);
    }

    #[test]
    fn test_numeric_field_from_another_dataset() {
        let result = filters("users with revenue above 500", DatasetType::Users);
        assert_eq!(result, vec![Filter::new("revenue", FilterOperator::Gt, 500.0)]);
    }

    #[test]
    fn test_quoted_value() {
        let result = filters("users where role = 'editor'", DatasetType::Users);
        assert_eq!(result, vec![Filter::new("role", FilterOperator::Eq, "editor")]);
    }

    #[test]
    fn test_active_shorthand() {
        assert_eq!(
            filters("show users who are active", DatasetType::Users),
            vec![Filter::new("status", FilterOperator::Eq, "active")]
        );
        assert!(filters("list active users", DatasetType::Users).is_empty());
        assert!(filters("show inactive users", DatasetType::Users).is_empty());
        // Only for the users dataset
        assert!(filters("products that are active", DatasetType::Products).is_empty());
    }

    #[test]
    fn test_active_shorthand_yields_to_explicit_status() {
        let result = filters("users active with status is pending", DatasetType::Users);
        assert_eq!(result, vec![Filter::new("status", FilterOperator::Eq, "pending")]);
    }

    #[test]
    fn test_stock_shorthands() {
        let cases = [
            ("show products in stock", "in_stock"),
            ("products in-stock", "in_stock"),
            ("products out of stock", "out_of_stock"),
            ("products out-of-stock", "out_of_stock"),
            ("show products low stock", "low_stock"),
        ];
        for (prompt, status) in cases {
            let result = filters(prompt, DatasetType::Products);
            assert_eq!(
                result.last(),
                Some(&Filter::new("status", FilterOperator::Eq, status)),
                "prompt: {prompt}"
            );
        }
        assert!(filters("users in stock", DatasetType::Users).is_empty());
    }

    #[test]
    fn test_nearest_field_tie_prefers_table_order() {
        // "sessions" and "session" both end at the same place; "sessions" is listed first
        let synonym = nearest_field("users sessions ", Lexicon::standard()).unwrap();
        assert_eq!(synonym.keyword, "sessions");
    }
}
