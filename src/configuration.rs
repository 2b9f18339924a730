use std::fmt;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::encoding::display_name;
use crate::error::{Error, Result};

/// Default column separator.
pub const DEFAULT_SEPARATOR: char = ',';
/// Default quote character.
pub const DEFAULT_QUOTE: char = '"';
/// Default escape character (doubled-quote escaping).
pub const DEFAULT_ESCAPE: char = '"';
/// Default decimal mark.
pub const DEFAULT_DECIMAL_MARK: char = '.';

/// How quote characters inside a quoted field are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeStyle {
    /// The quote character is doubled (`""`).
    Doubled,
    /// The quote character is prefixed with a distinct escape character (`\"`).
    Prefixed,
}

/// Format of a delimited-text file.
///
/// The configuration is a plain value: it is never stored inside the file,
/// only alongside application state when a host wants to skip detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Byte-to-text encoding, persisted as its WHATWG name.
    #[serde(with = "encoding_label")]
    pub encoding: &'static Encoding,
    /// Column separator (one character).
    pub column_separator: String,
    /// Quote character (one character).
    pub quote_character: String,
    /// Escape character (one character). Equal to the quote for doubling.
    pub escape_character: String,
    /// Decimal mark. Advisory only, never used by the tokenizer.
    pub decimal_mark: String,
    /// Whether the first row holds column names.
    pub first_row_as_header: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
            column_separator: DEFAULT_SEPARATOR.to_string(),
            quote_character: DEFAULT_QUOTE.to_string(),
            escape_character: DEFAULT_ESCAPE.to_string(),
            decimal_mark: DEFAULT_DECIMAL_MARK.to_string(),
            first_row_as_header: false,
        }
    }
}

impl Configuration {
    /// Create the default configuration (UTF-8, comma, double quote, no header).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the encoding.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the column separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.column_separator = separator.to_string();
        self
    }

    /// Set the quote character.
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote_character = quote.to_string();
        self
    }

    /// Set the escape character (equal to the quote for doubling).
    pub fn with_escape(mut self, escape: char) -> Self {
        self.escape_character = escape.to_string();
        self
    }

    /// Set the advisory decimal mark.
    pub fn with_decimal_mark(mut self, decimal_mark: char) -> Self {
        self.decimal_mark = decimal_mark.to_string();
        self
    }

    /// Mark whether the first row holds column names.
    pub fn with_header(mut self, first_row_as_header: bool) -> Self {
        self.first_row_as_header = first_row_as_header;
        self
    }

    /// The separator, or `,` when the field is empty.
    #[inline]
    pub fn separator_char(&self) -> char {
        first_char_or(&self.column_separator, DEFAULT_SEPARATOR)
    }

    /// The quote character, or `"` when the field is empty.
    #[inline]
    pub fn quote_char(&self) -> char {
        first_char_or(&self.quote_character, DEFAULT_QUOTE)
    }

    /// The escape character, or `"` when the field is empty.
    #[inline]
    pub fn escape_char(&self) -> char {
        first_char_or(&self.escape_character, DEFAULT_ESCAPE)
    }

    /// The decimal mark, or `.` when the field is empty.
    #[inline]
    pub fn decimal_mark_char(&self) -> char {
        first_char_or(&self.decimal_mark, DEFAULT_DECIMAL_MARK)
    }

    /// Escape style implied by the quote and escape characters.
    pub fn escape_style(&self) -> EscapeStyle {
        if self.escape_char() == self.quote_char() {
            EscapeStyle::Doubled
        } else {
            EscapeStyle::Prefixed
        }
    }

    /// Check that the configuration can round-trip data.
    ///
    /// Parsing and writing never call this: they substitute defaults for
    /// empty fields instead. It exists for hosts and the CLI to reject
    /// user-entered formats before applying them.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("column separator", &self.column_separator),
            ("quote character", &self.quote_character),
            ("escape character", &self.escape_character),
            ("decimal mark", &self.decimal_mark),
        ] {
            if value.chars().count() != 1 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be exactly one character, got {value:?}"
                )));
            }
        }

        let separator = self.separator_char();
        if separator == self.quote_char() {
            return Err(Error::InvalidConfig(
                "column separator and quote character must differ".to_string(),
            ));
        }
        if separator == '\n' || separator == '\r' || self.quote_char() == '\n' {
            return Err(Error::InvalidConfig(
                "line terminators cannot be used as separator or quote".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize to the persisted JSON record.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a persisted JSON record.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "encoding={} separator={:?} quote={:?} escape={:?} decimal={:?} header={}",
            display_name(self.encoding),
            self.separator_char(),
            self.quote_char(),
            self.escape_char(),
            self.decimal_mark_char(),
            self.first_row_as_header
        )
    }
}

fn first_char_or(value: &str, fallback: char) -> char {
    value.chars().next().unwrap_or(fallback)
}

/// Serde adapter storing an encoding as its name.
mod encoding_label {
    use encoding_rs::Encoding;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        encoding: &&'static Encoding,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(encoding.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<&'static Encoding, D::Error> {
        let label = String::deserialize(deserializer)?;
        Encoding::for_label(label.as_bytes())
            .ok_or_else(|| D::Error::custom(format!("unknown encoding {label:?}")))
    }
}
