//! Decimal mark inference.

use super::patterns::{COMMA_DECIMAL_PATTERN, DOT_DECIMAL_PATTERN};
use crate::configuration::DEFAULT_DECIMAL_MARK;
use crate::reader::Row;

/// Pick the decimal mark used by the majority of decimal-looking cells.
///
/// Defaults to `.` when there is no evidence either way.
pub fn infer_decimal_mark(rows: &[Row]) -> char {
    let mut comma = 0usize;
    let mut dot = 0usize;
    for cell in rows.iter().flatten() {
        let trimmed = cell.trim();
        if COMMA_DECIMAL_PATTERN.is_match(trimmed) {
            comma += 1;
        } else if DOT_DECIMAL_PATTERN.is_match(trimmed) {
            dot += 1;
        }
    }
    if comma > dot { ',' } else { DEFAULT_DECIMAL_MARK }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<Row> {
        lines
            .iter()
            .map(|r| r.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_comma_decimals() {
        let sample = rows(&[&["item", "price"], &["tea", "3,50"], &["cake", "1.234,75"]]);
        assert_eq!(infer_decimal_mark(&sample), ',');
    }

    #[test]
    fn test_dot_decimals() {
        let sample = rows(&[&["item", "price"], &["tea", "3.50"], &["cake", "12.75"]]);
        assert_eq!(infer_decimal_mark(&sample), '.');
    }

    #[test]
    fn test_no_evidence_defaults_to_dot() {
        assert_eq!(infer_decimal_mark(&rows(&[&["a", "b"], &["1", "2"]])), '.');
    }
}
