//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid file format (not a .roll file).
    #[error("Invalid roster file format")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Unsupported schema version.
    #[error("Roster file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Stored data decoded but does not describe a valid roster.
    #[error("Stored roster is invalid: {reason}")]
    InvalidRecord { reason: String },

    /// Serialization error.
    #[error("Failed to serialize roster data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize roster data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The file at {} is not a valid roster file: {}",
                    path.display(),
                    reason
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This roster was saved by a newer version of rollcall \
                    (file version {}, your version supports up to {}). \
                    Please update the application.",
                    found, max_supported
                )
            }
            Self::InvalidRecord { reason } => {
                format!("A stored roster could not be restored: {}", reason)
            }
            Self::Serialization { .. } => "An error occurred while saving the roster.".to_string(),
            Self::Deserialization { .. } => {
                "An error occurred while reading a roster. The file may be corrupted.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Remove files that are not rosters from the data directory.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Install the latest version of rollcall.".into()),
            Self::InvalidRecord { .. } | Self::Deserialization { .. } => {
                Some("Restore the roster from a backup if you have one.".into())
            }
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } => Some("Free up disk space and save again.".into()),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
