use std::io;
use thiserror::Error;

/// Error type for table I/O and serialization.
///
/// Detection never fails and parsing degrades to the sentinel table, so
/// most variants come from the write path or from the file helpers.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A cell contains text the target encoding cannot represent.
    #[error("cell at row {row}, column {column} cannot be represented in {encoding}")]
    Unrepresentable {
        encoding: &'static str,
        row: usize,
        column: usize,
    },

    /// An encoding label that does not name any known encoding.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Persisted configuration could not be read or written.
    #[error("Configuration record error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, Error>;
