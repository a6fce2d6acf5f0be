//! Row limit extraction

use once_cell::sync::Lazy;
use regex::Regex;

static LIMIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"top\s+([0-9]+)").unwrap(),
        Regex::new(r"first\s+([0-9]+)").unwrap(),
        Regex::new(r"([0-9]+)\s+(?:results?|items?|records?|rows?)").unwrap(),
        Regex::new(r"limit\s+([0-9]+)").unwrap(),
        Regex::new(r"show\s+([0-9]+)").unwrap(),
    ]
});

/// Extract a row cap from the first matching pattern
///
/// Zero is returned as-is. There is no upper bound; counts beyond `u64`
/// saturate.
pub fn extract_limit(prompt: &str) -> Option<u64> {
    let lower = prompt.to_lowercase();
    let caps = LIMIT_PATTERNS.iter().find_map(|pattern| pattern.captures(&lower))?;
    // Digits only, so parsing can only fail on overflow
    Some(caps.get(1)?.as_str().parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_phrases() {
        assert_eq!(extract_limit("top 5 users"), Some(5));
        assert_eq!(extract_limit("first 10 products"), Some(10));
        assert_eq!(extract_limit("show 3 results"), Some(3));
        assert_eq!(extract_limit("sales limit 20"), Some(20));
        assert_eq!(extract_limit("12 rows of users"), Some(12));
        assert_eq!(extract_limit("Show 7 Products"), Some(7));
    }

    #[test]
    fn test_first_pattern_wins() {
        assert_eq!(extract_limit("limit 20 but top 3"), Some(3));
    }

    #[test]
    fn test_edge_values() {
        assert_eq!(extract_limit("top 0 sales"), Some(0));
        assert_eq!(extract_limit("top 99999999999 sales"), Some(99_999_999_999));
        assert_eq!(
            extract_limit("top 99999999999999999999999 sales"),
            Some(u64::MAX)
        );
        assert_eq!(extract_limit("show users"), None);
    }
}
