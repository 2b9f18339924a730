//! Header row evidence.

use foldhash::{HashSet, HashSetExt};

use super::patterns::is_numeric;
use crate::reader::Row;

/// Decide whether the first row looks like column names.
///
/// Compares the first row with the second: headers tend to be text where
/// the data below has numbers, contain no duplicates, and are no longer
/// than the values under them. Needs at least two rows.
pub fn looks_like_header(rows: &[Row]) -> bool {
    let [first_row, second_row, ..] = rows else {
        return false;
    };

    let mut header_score = 0.0;
    let mut checks: u32 = 0;

    // Check 1: First row has more text cells than the second
    let first_text_count = count_text(first_row);
    let second_text_count = count_text(second_row);
    if first_text_count > second_text_count {
        header_score += 1.0;
    }
    checks += 1;

    // Check 2: First row has more text than numeric
    let first_numeric_count = first_row.iter().filter(|s| is_numeric(s)).count();
    if first_text_count > first_numeric_count {
        header_score += 0.5;
    }
    checks += 1;

    // Check 3: No duplicates in first row
    let mut seen = HashSet::with_capacity(first_row.len());
    if first_row.iter().all(|s| seen.insert(s.as_str())) {
        header_score += 0.5;
    }
    checks += 1;

    // Check 4: First row values are shorter (headers tend to be concise)
    if average_len(first_row) <= average_len(second_row) {
        header_score += 0.3;
    }
    checks += 1;

    (header_score / f64::from(checks)) > 0.4
}

fn count_text(row: &[String]) -> usize {
    row.iter()
        .filter(|s| !s.trim().is_empty() && !is_numeric(s))
        .count()
}

fn average_len(row: &[String]) -> f64 {
    let total: usize = row.iter().map(|s| s.chars().count()).sum();
    total as f64 / row.len().max(1) as f64
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
    fn test_labels_over_numbers() {
        assert!(looks_like_header(&rows(&[
            &["name", "age"],
            &["Alice", "30"],
            &["Bob", "25"],
        ])));
    }

    #[test]
    fn test_all_numeric_is_not_header() {
        assert!(!looks_like_header(&rows(&[&["1", "2", "3"], &["4", "5", "6"]])));
    }

    #[test]
    fn test_all_text_is_not_header() {
        assert!(!looks_like_header(&rows(&[&["a", "b"], &["c", "d"]])));
    }

    #[test]
    fn test_single_column_header() {
        assert!(looks_like_header(&rows(&[&["value"], &["100"], &["200"]])));
    }

    #[test]
    fn test_needs_two_rows() {
        assert!(!looks_like_header(&rows(&[&["name", "age"]])));
        assert!(!looks_like_header(&[]));
    }
}
