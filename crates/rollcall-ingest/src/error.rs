//! Error types for roster imports.

use std::path::PathBuf;

use rollcall_model::RosterError;
use thiserror::Error;

use crate::validate::TabularFormat;

/// Errors that can occur while validating or reading an import file.
///
/// Row-level problems never show up here: incomplete rows are skipped and
/// counted. Any error returned aborts the whole batch.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Validation Errors ===
    /// Neither the declared media type nor the file name is a tabular format.
    #[error("unsupported file format: {name} (only .xlsx, .xls or .csv files are accepted)")]
    UnsupportedFormat {
        name: String,
        media_type: Option<String>,
    },

    /// File is above the import size ceiling.
    #[error("file {name} is too large: {size} bytes (maximum {max_size} bytes)")]
    FileTooLarge {
        name: String,
        size: u64,
        max_size: u64,
    },

    // === File System Errors ===
    /// Import file not found.
    #[error("import file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Text encoding we cannot read.
    #[error("unsupported text encoding: {encoding} (save the file as UTF-8)")]
    UnsupportedEncoding { encoding: &'static str },

    /// Content could not be parsed as the detected format.
    #[error("could not read {format} content: {message}")]
    Parse {
        format: TabularFormat,
        message: String,
    },

    /// A normalized row failed person validation.
    #[error("invalid imported record: {0}")]
    InvalidRecord(#[from] RosterError),

    /// The background read task was cancelled or panicked.
    #[error("import task failed: {message}")]
    Task { message: String },
}

impl IngestError {
    pub(crate) fn parse(format: TabularFormat, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            message: err.to_string(),
        }
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, IngestError>;
