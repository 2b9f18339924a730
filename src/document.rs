//! A table together with the configuration that owns it.

use std::path::Path;

use crate::configuration::Configuration;
use crate::error::Result;
use crate::reader::Reader;
use crate::sniffer::Sniffer;
use crate::table::Table;
use crate::writer::Writer;

/// Tokenize `data` into a table.
///
/// Never fails as a whole: fields that do not decode read as empty strings
/// and input that yields no cells becomes the sentinel table.
pub fn parse_table(data: &[u8], configuration: &Configuration) -> Table {
    let rows = Reader::new(data, configuration).read_all();
    let table = Table::from_rows(rows);
    if table.is_sentinel() && !data.is_empty() {
        tracing::warn!(
            bytes = data.len(),
            configuration = %configuration,
            "input produced no cells, using empty table"
        );
    }
    table
}

/// Serialize a table under `configuration`.
///
/// Fails only when the target encoding cannot represent some cell.
pub fn serialize_table(table: &Table, configuration: &Configuration) -> Result<Vec<u8>> {
    Writer::new(configuration).to_bytes(table.rows())
}

/// Document state: the table plus its owning configuration.
///
/// Changing the configuration never re-tokenizes the table; it only affects
/// later saves (or an explicit [`Document::reparse`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    table: Table,
    configuration: Configuration,
}

impl Document {
    /// An empty document with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(table: Table, configuration: Configuration) -> Self {
        Self {
            table,
            configuration,
        }
    }

    /// Detect the configuration of `data` and parse it.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_bytes_with(data, &Sniffer::new())
    }

    /// Detect with a preconfigured sniffer and parse.
    pub fn from_bytes_with(data: &[u8], sniffer: &Sniffer) -> Self {
        let configuration = sniffer.detect(data);
        Self::parse(data, configuration)
    }

    /// Parse `data` under a known configuration.
    pub fn parse(data: &[u8], configuration: Configuration) -> Self {
        Self {
            table: parse_table(data, &configuration),
            configuration,
        }
    }

    /// Replace the table by re-tokenizing `data` under `configuration`,
    /// which becomes the owning configuration.
    pub fn reparse(&mut self, data: &[u8], configuration: Configuration) {
        self.table = parse_table(data, &configuration);
        self.configuration = configuration;
    }

    /// Swap the owning configuration without touching the table.
    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
    }

    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[inline]
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn into_parts(self) -> (Table, Configuration) {
        (self.table, self.configuration)
    }

    /// The first row when the configuration marks it as a header.
    pub fn header(&self) -> Option<&[String]> {
        if self.configuration.first_row_as_header {
            self.table.row(0)
        } else {
            None
        }
    }

    /// Rows below the header (all rows when there is none).
    pub fn data_rows(&self) -> &[Vec<String>] {
        let rows = self.table.rows();
        if self.configuration.first_row_as_header {
            &rows[1..]
        } else {
            rows
        }
    }

    /// Serialize the table under the owning configuration.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize_table(&self.table, &self.configuration)
    }

    /// Read, detect and parse the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "opening document");
        Ok(Self::from_bytes(&data))
    }

    /// Serialize and write to `path`.
    ///
    /// Nothing is written when the table cannot be encoded.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }
}
