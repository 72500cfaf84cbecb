//! Pre-parse checks on import files.
//!
//! These run before any byte of content is read: the file must look like a
//! supported tabular format and stay under [`MAX_IMPORT_FILE_SIZE`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Maximum import file size (10 MiB).
pub const MAX_IMPORT_FILE_SIZE: u64 = 10 * 1024 * 1024;

const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MEDIA_TYPE: &str = "application/vnd.ms-excel";
const CSV_MEDIA_TYPE: &str = "text/csv";

/// Accepted tabular file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabularFormat {
    /// Spreadsheet XML workbook.
    Xlsx,
    /// Legacy binary workbook.
    Xls,
    /// Comma-separated text.
    Csv,
}

impl TabularFormat {
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            XLSX_MEDIA_TYPE => Some(Self::Xlsx),
            XLS_MEDIA_TYPE => Some(Self::Xls),
            CSV_MEDIA_TYPE => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for TabularFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xlsx => "XLSX",
            Self::Xls => "XLS",
            Self::Csv => "CSV",
        })
    }
}

/// What is known about a file before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File name, used for the extension fallback.
    pub name: String,
    /// Declared media type, when the caller has one.
    pub media_type: Option<String>,
    /// Size in bytes.
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, media_type: Option<&str>, size: u64) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            size,
        }
    }

    /// Describe a file on disk from its metadata. No media type is declared.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                IngestError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, None, metadata.len()))
    }
}

/// Check a file against the accepted formats and the size ceiling.
///
/// The declared media type wins over the extension when both are known.
pub fn validate_import_file(file: &FileDescriptor) -> Result<TabularFormat> {
    validate_import_file_with_limit(file, MAX_IMPORT_FILE_SIZE)
}

/// Same as [`validate_import_file`] with a custom size ceiling.
pub fn validate_import_file_with_limit(file: &FileDescriptor, max_size: u64) -> Result<TabularFormat> {
    let format = file
        .media_type
        .as_deref()
        .and_then(TabularFormat::from_media_type)
        .or_else(|| TabularFormat::from_file_name(&file.name))
        .ok_or_else(|| IngestError::UnsupportedFormat {
            name: file.name.clone(),
            media_type: file.media_type.clone(),
        })?;

    if file.size > max_size {
        return Err(IngestError::FileTooLarge {
            name: file.name.clone(),
            size: file.size,
            max_size,
        });
    }

    Ok(format)
}
