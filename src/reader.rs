//! Single-pass, byte-oriented tokenizer for delimited text.
//!
//! The reader scans raw bytes in the configured encoding and only decodes
//! when a field is complete, so the cursor is always a byte offset. UTF-16
//! and multi-byte legacy input is transcoded to UTF-8 up front (see
//! [`prepare_input`]).

use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::configuration::{
    Configuration, DEFAULT_ESCAPE, DEFAULT_QUOTE, DEFAULT_SEPARATOR, EscapeStyle,
};
use crate::encoding::{decode_field, encode_char, prepare_input};

/// One parsed row of fields.
pub type Row = Vec<String>;

/// Tokenizer over a byte buffer.
///
/// # Example
///
/// ```
/// use tabsniff::{Configuration, Reader};
///
/// let config = Configuration::new().with_separator(';');
/// let mut reader = Reader::new(b"a;\"b;c\"\r\n1;2", &config);
///
/// assert_eq!(reader.read_row(), Some(vec!["a".to_string(), "b;c".to_string()]));
/// assert_eq!(reader.read_row(), Some(vec!["1".to_string(), "2".to_string()]));
/// assert_eq!(reader.read_row(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: Cow<'a, [u8]>,
    field_encoding: &'static Encoding,
    separator: Vec<u8>,
    quote: Vec<u8>,
    escape: Vec<u8>,
    escape_style: EscapeStyle,
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over raw bytes in `configuration.encoding`.
    pub fn new(data: &'a [u8], configuration: &Configuration) -> Self {
        let (data, field_encoding) = prepare_input(data, configuration.encoding);
        Self::from_prepared(data, field_encoding, configuration)
    }

    /// Create a reader over already-decoded text.
    ///
    /// The encoding in `configuration` is ignored; fields decode as UTF-8.
    pub fn from_text(text: &'a str, configuration: &Configuration) -> Self {
        Self::from_prepared(
            Cow::Borrowed(text.as_bytes()),
            encoding_rs::UTF_8,
            configuration,
        )
    }

    /// Create a reader over a buffer already passed through [`prepare_input`].
    pub(crate) fn from_prepared(
        data: Cow<'a, [u8]>,
        field_encoding: &'static Encoding,
        configuration: &Configuration,
    ) -> Self {
        Self {
            data,
            field_encoding,
            separator: encode_char(
                configuration.separator_char(),
                field_encoding,
                DEFAULT_SEPARATOR,
            ),
            quote: encode_char(configuration.quote_char(), field_encoding, DEFAULT_QUOTE),
            escape: encode_char(configuration.escape_char(), field_encoding, DEFAULT_ESCAPE),
            escape_style: configuration.escape_style(),
            position: 0,
        }
    }

    /// Byte offset of the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true once the cursor has consumed the entire buffer.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Move the cursor back to the start of the buffer.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    #[inline]
    fn matches_at(&self, pos: usize, pattern: &[u8]) -> bool {
        self.data
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(pattern))
    }

    /// Read the next row, or `None` when the cursor is already at the end.
    ///
    /// A returned row always has at least one field, even for a blank line.
    pub fn read_row(&mut self) -> Option<Row> {
        if self.is_at_end() {
            return None;
        }

        let len = self.data.len();
        let mut fields = Vec::new();
        let mut field: Vec<u8> = Vec::new();
        let mut inside_quotes = false;
        let mut i = self.position;

        while i < len {
            if inside_quotes {
                match self.escape_style {
                    EscapeStyle::Doubled => {
                        if self.matches_at(i, &self.quote) {
                            let next = i + self.quote.len();
                            if self.matches_at(next, &self.escape) {
                                field.extend_from_slice(&self.quote);
                                i = next + self.escape.len();
                            } else {
                                inside_quotes = false;
                                i = next;
                            }
                            continue;
                        }
                    }
                    EscapeStyle::Prefixed => {
                        if self.matches_at(i, &self.escape) {
                            let next = i + self.escape.len();
                            if self.matches_at(next, &self.quote) {
                                field.extend_from_slice(&self.quote);
                                i = next + self.quote.len();
                            } else if self.matches_at(next, &self.escape) {
                                field.extend_from_slice(&self.escape);
                                i = next + self.escape.len();
                            } else {
                                // A lone escape is ordinary content.
                                field.extend_from_slice(&self.escape);
                                i = next;
                            }
                            continue;
                        }
                        if self.matches_at(i, &self.quote) {
                            inside_quotes = false;
                            i += self.quote.len();
                            continue;
                        }
                    }
                }
                field.push(self.data[i]);
                i += 1;
                continue;
            }

            if self.matches_at(i, &self.separator) {
                fields.push(decode_field(&field, self.field_encoding));
                field.clear();
                i += self.separator.len();
                continue;
            }
            if self.matches_at(i, &self.quote) {
                inside_quotes = true;
                i += self.quote.len();
                continue;
            }

            match self.data[i] {
                b'\n' => {
                    i += 1;
                    break;
                }
                b'\r' => {
                    i += 1;
                    if i < len && self.data[i] == b'\n' {
                        i += 1;
                    }
                    break;
                }
                byte => {
                    field.push(byte);
                    i += 1;
                }
            }
        }

        // An unterminated quote simply ends with the input.
        fields.push(decode_field(&field, self.field_encoding));
        self.position = i;
        Some(fields)
    }

    /// Read every remaining row.
    pub fn read_all(&mut self) -> Vec<Row> {
        self.by_ref().collect()
    }

    /// Read the next row and remap it for pasting into fixed columns.
    ///
    /// See [`remap_for_paste`].
    pub fn read_row_for_pasting(
        &mut self,
        column_order: &[usize],
        max_column_index: usize,
    ) -> Option<Row> {
        self.read_row()
            .map(|row| remap_for_paste(row, column_order, max_column_index))
    }
}

impl Iterator for Reader<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row()
    }
}

/// Place the fields of `row` into a row of `max_column_index + 1` cells.
///
/// Field `i` lands in column `column_order[i]`. Fields without a mapping,
/// or whose target column exceeds `max_column_index`, are dropped. A width
/// that does not fit in `usize` yields an empty row.
pub fn remap_for_paste(row: Row, column_order: &[usize], max_column_index: usize) -> Row {
    let Some(width) = max_column_index.checked_add(1) else {
        return Row::new();
    };
    let mut adjusted = vec![String::new(); width];
    for (value, &target) in row.into_iter().zip(column_order) {
        if target <= max_column_index {
            adjusted[target] = value;
        }
    }
    adjusted
}
