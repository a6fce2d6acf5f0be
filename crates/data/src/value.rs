//! Loose value coercions used by the query engine
//!
//! Query parameters and record fields arrive as arbitrary text and are
//! compared the way a browser client would: `parseFloat`-style prefix
//! parsing for record values, whole-string numeric checks for filter
//! operands, and `parseInt`-style prefix parsing for the row limit.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?))")
        .unwrap()
});

static INT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").unwrap());

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)$").unwrap()
});

static RADIX_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0([xXoObB])([0-9A-Fa-f]+)$").unwrap());

fn parse_decimal(literal: &str) -> Option<f64> {
    match literal.trim_start_matches('+') {
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        other => other.parse().ok(),
    }
}

/// Longest numeric prefix of `text`, ignoring leading whitespace
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let caps = FLOAT_PREFIX.captures(text)?;
    parse_decimal(caps.get(1)?.as_str())
}

/// Longest integer prefix of `text`, ignoring leading whitespace
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let caps = INT_PREFIX.captures(text)?;
    let digits = caps.get(1)?.as_str();
    // Saturate rather than reject absurdly long digit runs
    digits.parse().ok().or_else(|| {
        Some(if digits.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        })
    })
}

/// Whether the whole string reads as a number; blank text counts as zero
pub fn is_numeric_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || DECIMAL_LITERAL.is_match(trimmed) {
        return true;
    }
    RADIX_LITERAL
        .captures(trimmed)
        .and_then(|caps| {
            let radix = match caps.get(1)?.as_str() {
                "x" | "X" => 16,
                "o" | "O" => 8,
                _ => 2,
            };
            u64::from_str_radix(caps.get(2)?.as_str(), radix).ok()
        })
        .is_some()
}

/// Numeric reading of a record value, `None` when it has none
pub fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

/// Text reading of a record value
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  3.5kg"), Some(3.5));
        assert_eq!(parse_float_prefix("-.5"), Some(-0.5));
        assert_eq!(parse_float_prefix("1e3 units"), Some(1000.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("2024-12-18"), Some(2024.0));
        assert_eq!(parse_float_prefix("Jan"), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("5"), Some(5));
        assert_eq!(parse_int_prefix(" 12rows"), Some(12));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("2.9"), Some(2));
        assert_eq!(parse_int_prefix("ten"), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_is_numeric_text() {
        assert!(is_numeric_text("100"));
        assert!(is_numeric_text(" 4.5 "));
        assert!(is_numeric_text(""));
        assert!(is_numeric_text("0x1F"));
        assert!(is_numeric_text("1e3"));
        assert!(!is_numeric_text("admin"));
        assert!(!is_numeric_text("12abc"));
        assert!(!is_numeric_text("inf"));
        assert!(!is_numeric_text("NaN"));
    }

    #[test]
    fn test_value_readings() {
        assert_eq!(value_as_number(&json!(149.99)), Some(149.99));
        assert_eq!(value_as_number(&json!("45 sessions")), Some(45.0));
        assert_eq!(value_as_number(&json!(true)), None);
        assert_eq!(value_as_text(&json!(399)), "399");
        assert_eq!(value_as_text(&json!(399.0)), "399");
        assert_eq!(value_as_text(&json!(89.5)), "89.5");
        assert_eq!(value_as_text(&json!("Admin")), "Admin");
    }
}
