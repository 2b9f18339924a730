//! Compiled regex patterns for numeric cell classification.

use regex::Regex;

/// Any plain number: optional sign, digits with `.` or `,` groups, optional
/// exponent or percent sign.
pub static NUMBER_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+(?:[.,]\d+)*|[.,]\d+)(?:[eE][-+]?\d+)?%?$")
        .expect("Invalid number pattern")
});

/// Decimal number written with a comma mark (`3,14`, `1.234,5`).
pub static COMMA_DECIMAL_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d{1,3}(?:\.\d{3})+|\d+),\d+$").expect("Invalid comma decimal pattern")
});

/// Decimal number written with a dot mark (`3.14`, `1,234.5`).
pub static DOT_DECIMAL_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d+$").expect("Invalid dot decimal pattern")
});

/// Returns true if the trimmed cell reads as a number.
#[inline]
pub fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && NUMBER_PATTERN.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric() {
        for value in ["1", "-2", "+3.5", "3,14", "1.234,56", "1e10", "50%", " 7 ", ".5"] {
            assert!(is_numeric(value), "{value} should be numeric");
        }
        for value in ["", "abc", "1a", "12-31", "--1", "1..2"] {
            assert!(!is_numeric(value), "{value} should not be numeric");
        }
    }

    #[test]
    fn test_decimal_patterns() {
        assert!(COMMA_DECIMAL_PATTERN.is_match("3,14"));
        assert!(COMMA_DECIMAL_PATTERN.is_match("1.234,5"));
        assert!(!COMMA_DECIMAL_PATTERN.is_match("3.14"));
        assert!(DOT_DECIMAL_PATTERN.is_match("3.14"));
        assert!(DOT_DECIMAL_PATTERN.is_match("1,234.5"));
        assert!(!DOT_DECIMAL_PATTERN.is_match("42"));
    }
}
