//! Sort extraction

use once_cell::sync::Lazy;
use regex::Regex;

use prompt_dashboard_core::{SortDirection, SortSpec};

use crate::lexicon::Lexicon;

/// How a sort pattern determines its direction
enum Direction {
    /// Optional direction word in capture group 2, descending when absent
    Captured,
    Fixed(SortDirection),
}

// Families in priority order; the first one that matches anywhere wins
static SORT_PATTERNS: Lazy<Vec<(Regex, Direction)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"sort(?:ed)?\s+by\s+([0-9A-Za-z_]+)\s*(asc|desc|ascending|descending)?")
                .unwrap(),
            Direction::Captured,
        ),
        (
            Regex::new(r"order(?:ed)?\s+by\s+([0-9A-Za-z_]+)\s*(asc|desc|ascending|descending)?")
                .unwrap(),
            Direction::Captured,
        ),
        (
            Regex::new(r"highest\s+([0-9A-Za-z_]+)").unwrap(),
            Direction::Fixed(SortDirection::Desc),
        ),
        (
            Regex::new(r"lowest\s+([0-9A-Za-z_]+)").unwrap(),
            Direction::Fixed(SortDirection::Asc),
        ),
        (
            Regex::new(r"top\s+([0-9A-Za-z_]+)").unwrap(),
            Direction::Fixed(SortDirection::Desc),
        ),
        (
            Regex::new(r"bottom\s+([0-9A-Za-z_]+)").unwrap(),
            Direction::Fixed(SortDirection::Asc),
        ),
    ]
});

/// Extract at most one sort directive
///
/// The captured token is mapped through the field synonyms by exact key; an
/// unknown token is used verbatim, so "top 5 users" sorts by a field named "5".
pub fn extract_sort(prompt: &str, lexicon: &Lexicon) -> Option<SortSpec> {
    let lower = prompt.to_lowercase();

    SORT_PATTERNS.iter().find_map(|(pattern, direction)| {
        let caps = pattern.captures(&lower)?;
        let token = caps.get(1)?.as_str();
        let field = lexicon
            .field_for_keyword(token)
            .map(|synonym| synonym.field.clone())
            .unwrap_or_else(|| token.to_string());

        let direction = match direction {
            Direction::Fixed(direction) => *direction,
            Direction::Captured => caps
                .get(2)
                .map(|word| SortDirection::from_word(word.as_str()))
                .unwrap_or(SortDirection::Desc),
        };
        Some(SortSpec::new(field, direction))
    })
}
