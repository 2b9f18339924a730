//! Serializer producing text that re-tokenizes to the same rows.

use std::borrow::Cow;

use crate::configuration::{Configuration, EscapeStyle};
use crate::encoding::encode_text;
use crate::error::{Error, Result};

/// Writes rows of fields under a [`Configuration`].
///
/// Rows are joined with `\n` and there is no terminator after the last row.
#[derive(Debug, Clone)]
pub struct Writer {
    configuration: Configuration,
    separator: char,
    quote: char,
    escape: char,
    escape_style: EscapeStyle,
}

impl Writer {
    /// Create a writer for the given configuration.
    pub fn new(configuration: &Configuration) -> Self {
        Self {
            configuration: configuration.clone(),
            separator: configuration.separator_char(),
            quote: configuration.quote_char(),
            escape: configuration.escape_char(),
            escape_style: configuration.escape_style(),
        }
    }

    /// The configuration this writer serializes with.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Returns true if `field` must be wrapped in quote characters.
    pub fn needs_quoting(&self, field: &str) -> bool {
        field.contains(self.separator)
            || field.contains(self.quote)
            || field.contains('\n')
            || field.contains('\r')
            || field.starts_with(char::is_whitespace)
            || field.ends_with(char::is_whitespace)
    }

    /// Render a single field, quoting and escaping it when required.
    pub fn write_field<'f>(&self, field: &'f str) -> Cow<'f, str> {
        if !self.needs_quoting(field) {
            return Cow::Borrowed(field);
        }
        Cow::Owned(self.quoted(field))
    }

    fn quoted(&self, field: &str) -> String {
        let mut out = String::with_capacity(field.len() + 2);
        out.push(self.quote);
        for c in field.chars() {
            match self.escape_style {
                EscapeStyle::Doubled if c == self.quote => {
                    out.push(self.quote);
                    out.push(self.quote);
                }
                // The escape character itself is escaped too, so content
                // like a trailing backslash cannot swallow the closing quote.
                EscapeStyle::Prefixed if c == self.quote || c == self.escape => {
                    out.push(self.escape);
                    out.push(c);
                }
                _ => out.push(c),
            }
        }
        out.push(self.quote);
        out
    }

    /// Render one row, fields joined by the separator.
    pub fn write_row<S: AsRef<str>>(&self, row: &[S]) -> String {
        let mut out = String::new();
        self.push_row(&mut out, row, false);
        out
    }

    fn push_row<S: AsRef<str>>(&self, out: &mut String, row: &[S], explicit_empty: bool) {
        // A final row with no content would otherwise vanish into the
        // preceding line terminator.
        let blank = match row {
            [] => true,
            [only] => only.as_ref().is_empty(),
            _ => false,
        };
        if explicit_empty && blank {
            out.push(self.quote);
            out.push(self.quote);
            return;
        }
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                out.push(self.separator);
            }
            out.push_str(&self.write_field(field.as_ref()));
        }
    }

    /// Render all rows as text.
    pub fn write_rows<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> String {
        let mut out = String::new();
        let last = rows.len().saturating_sub(1);
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.push_row(&mut out, row, i == last && i > 0);
        }
        out
    }

    /// Render all rows and encode them in the configured encoding.
    ///
    /// Fails with [`Error::Unrepresentable`] naming the first cell the
    /// encoding cannot represent.
    pub fn to_bytes<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> Result<Vec<u8>> {
        let text = self.write_rows(rows);
        let encoding = self.configuration.encoding;
        if let Some(bytes) = encode_text(&text, encoding) {
            return Ok(bytes);
        }

        let (row, column) = first_unrepresentable(rows, encoding).unwrap_or((0, 0));
        tracing::warn!(
            encoding = encoding.name(),
            row,
            column,
            "table content cannot be represented in target encoding"
        );
        Err(Error::Unrepresentable {
            encoding: encoding.name(),
            row,
            column,
        })
    }
}

fn first_unrepresentable<S: AsRef<str>>(
    rows: &[Vec<S>],
    encoding: &'static encoding_rs::Encoding,
) -> Option<(usize, usize)> {
    rows.iter().enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|cell| encode_text(cell.as_ref(), encoding).is_none())
            .map(|c| (r, c))
    })
}
