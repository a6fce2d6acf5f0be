//! Component and chart-type detection

use once_cell::sync::Lazy;
use regex::Regex;

use prompt_dashboard_core::{ChartType, ComponentType};

use crate::lexicon::Lexicon;

const CHART_WORDS: &[&str] = &["chart", "graph", "visualization", "visualize", "plot", "trend"];

const CARD_WORDS: &[&str] = &[
    "card", "cards", "summary", "overview", "stats", "statistics", "kpi", "metric",
];

const TABLE_WORDS: &[&str] = &["table", "list", "rows", "records"];

static FILTER_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"filter|where|condition|above|below|greater|less|equals?").unwrap()
});

/// Presentation kind: chart words, then card words, then table words
///
/// Without any of those, prompts that read like a filter become tables and
/// everything else becomes a chart.
pub fn detect_component(prompt: &str) -> ComponentType {
    let lower = prompt.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| lower.contains(word));

    if mentions(CHART_WORDS) {
        ComponentType::Chart
    } else if mentions(CARD_WORDS) {
        ComponentType::Card
    } else if mentions(TABLE_WORDS) || FILTER_VOCABULARY.is_match(&lower) {
        ComponentType::Table
    } else {
        ComponentType::Chart
    }
}

/// Chart sub-kind from the first chart keyword token, bar by default
pub fn detect_chart_type(prompt: &str, lexicon: &Lexicon) -> ChartType {
    prompt
        .to_lowercase()
        .split_whitespace()
        .find_map(|token| lexicon.chart_for_token(token))
        .unwrap_or(ChartType::Bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_priority() {
        assert_eq!(detect_component("bar chart of sales"), ComponentType::Chart);
        assert_eq!(detect_component("show sales trend"), ComponentType::Chart);
        assert_eq!(detect_component("summary of sales"), ComponentType::Card);
        assert_eq!(detect_component("list users in table"), ComponentType::Table);
        // Chart outranks card
        assert_eq!(detect_component("summary chart"), ComponentType::Chart);
        // Card outranks table
        assert_eq!(detect_component("list of kpi cards"), ComponentType::Card);
    }

    #[test]
    fn test_component_matches_substrings() {
        // "plot" inside "plotting", "list" inside "listing"
        assert_eq!(detect_component("plotting revenue"), ComponentType::Chart);
        assert_eq!(detect_component("listing of users"), ComponentType::Table);
    }

    #[test]
    fn test_component_defaults() {
        assert_eq!(detect_component("users where role is admin"), ComponentType::Table);
        assert_eq!(detect_component("revenue above 1000"), ComponentType::Table);
        assert_eq!(detect_component("show users"), ComponentType::Chart);
        assert_eq!(detect_component(""), ComponentType::Chart);
    }

    #[test]
    fn test_chart_type() {
        let lexicon = Lexicon::standard();
        assert_eq!(detect_chart_type("area chart revenue", lexicon), ChartType::Area);
        assert_eq!(detect_chart_type("show sales trend", lexicon), ChartType::Line);
        assert_eq!(detect_chart_type("column graph", lexicon), ChartType::Bar);
        assert_eq!(detect_chart_type("line and area", lexicon), ChartType::Line);
        // Tokens only: "trending" is not "trend"
        assert_eq!(detect_chart_type("trending sales", lexicon), ChartType::Bar);
    }
}
