//! tabsniff: delimited-text format inference, parsing and serialization
//!
//! Given bytes that look like tabular text, tabsniff infers the encoding,
//! column separator, quote and escape characters and whether the first row
//! is a header, then parses the bytes into a [`Table`] of string cells and
//! writes tables back to bytes that re-parse to the same cells.
//!
//! # Quick Start
//!
//! ```
//! use tabsniff::{Configuration, detect_configuration, parse, serialize};
//!
//! let data = b"name;age\n\"Alice\";30\n\"Bob\";25";
//!
//! let config = detect_configuration(data);
//! assert_eq!(config.separator_char(), ';');
//!
//! let mut table = parse(data, &config);
//! table.update_cell(2, 1, "26");
//!
//! let comma = Configuration::default();
//! let bytes = serialize(&table, &comma).unwrap();
//! assert_eq!(bytes, b"name,age\nAlice,30\nBob,26");
//! ```
//!
//! # Detection
//!
//! Detection narrows the search before scoring it:
//! 1. Encoding candidates from byte-order marks and decode checks
//! 2. Separator candidates ranked from character counts in a short prefix
//! 3. The product with quote and escape characters and the header flag
//! 4. Each candidate tokenizes the first rows and receives an integer score
//!
//! The highest score wins and ties go to the earliest generated candidate,
//! so detection is deterministic. Tune it through [`Sniffer`].

mod configuration;
mod document;
mod encoding;
mod error;
mod heuristic;
mod reader;
mod sample;
mod sniffer;
mod table;
mod writer;

pub use configuration::{Configuration, EscapeStyle};
pub use document::{Document, parse_table, serialize_table};
pub use error::{Error, Result};
pub use heuristic::score::{CandidateScore, ScoringWeights};
pub use reader::{Reader, Row, remap_for_paste};
pub use sample::SampleLimits;
pub use sniffer::{DetectionReport, Sniffer};
pub use table::Table;
pub use writer::Writer;

// Re-export for advanced usage
pub use encoding::{
    display_name as encoding_display_name, encoding_for_label, is_utf8, supported_encodings,
};
pub use encoding_rs::Encoding;

/// Detect the most likely configuration of `data` with default settings.
///
/// Never fails; falls back to [`Configuration::default`].
pub fn detect_configuration(data: &[u8]) -> Configuration {
    Sniffer::new().detect(data)
}

/// Parse `data` under `configuration`.
///
/// Never fails; input without cells yields the one-empty-cell table.
pub fn parse(data: &[u8], configuration: &Configuration) -> Table {
    parse_table(data, configuration)
}

/// Serialize `table` under `configuration`.
///
/// Fails with [`Error::Unrepresentable`] when the target encoding cannot
/// represent some cell.
pub fn serialize(table: &Table, configuration: &Configuration) -> Result<Vec<u8>> {
    serialize_table(table, configuration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api() {
        // Verify all public types are accessible
        let _sniffer = Sniffer::new();
        let _limits = SampleLimits::default();
        let _weights = ScoringWeights::default();
        let _table = Table::new();
        let _doc = Document::new();
        assert!(!supported_encodings().is_empty());
    }

    #[test]
    fn test_detect_simple_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6\n";
        let config = detect_configuration(data);

        assert_eq!(config.separator_char(), ',');
        assert_eq!(parse(data, &config).max_column_count(), 3);
    }

    #[test]
    fn test_builder_pattern() {
        let mut sniffer = Sniffer::new();
        sniffer
            .sample_limits(SampleLimits::new(2000, 20, 10, 3))
            .separator(';')
            .quote('\'')
            .parallel(false);

        // Verify builder returns &mut Self for chaining
        assert_eq!(sniffer.detect(b"a;b\n1;2").separator_char(), ';');
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let config = Configuration::new().with_separator('\t').with_escape('\\');
        let table = Table::from_rows(vec![
            vec!["a\tb".to_string(), "c\"d".to_string()],
            vec!["\\".to_string(), String::new()],
        ]);
        let bytes = serialize(&table, &config).unwrap();
        assert_eq!(parse(&bytes, &config), table);
    }
}
