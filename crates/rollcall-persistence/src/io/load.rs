//! Roster loading operations.

use std::fs;
use std::path::{Path, PathBuf};

use rkyv::util::AlignedVec;
use rollcall_model::Roster;

use crate::convert::FromSnapshot;
use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, MAGIC_BYTES, RosterFile};

/// Load a roster from a .roll file.
pub fn load_roster_file(path: &Path) -> Result<Roster> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;

    let roster = decode_roster(&bytes, path)?;
    tracing::debug!(
        roster_id = %roster.id(),
        people = roster.len(),
        path = %path.display(),
        "loaded roster file"
    );
    Ok(roster)
}

/// Load a roster on the blocking thread pool.
pub async fn load_roster_file_async(path: PathBuf) -> Result<Roster> {
    tokio::task::spawn_blocking(move || load_roster_file(&path))
        .await
        .map_err(|e| PersistenceError::Deserialization {
            source: Box::new(e),
        })?
}

/// Validate the header and decode a roster from raw file bytes.
///
/// `path` is only used for error reporting.
pub fn decode_roster(bytes: &[u8], path: &Path) -> Result<Roster> {
    // Minimum size: magic (4) + version (4) + some payload
    if bytes.len() < 12 {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "File too small".to_string(),
        });
    }

    if bytes[0..4] != MAGIC_BYTES {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "Not a roster file (invalid magic bytes)".to_string(),
        });
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    // The payload starts at offset 8 of an arbitrary buffer; rkyv needs it aligned.
    let mut payload = AlignedVec::<16>::with_capacity(bytes.len() - 8);
    payload.extend_from_slice(&bytes[8..]);

    let file = rkyv::from_bytes::<RosterFile, rkyv::rancor::Error>(&payload).map_err(|e| {
        PersistenceError::Deserialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv deserialization failed: {e}"
            ))),
        }
    })?;

    Roster::from_snapshot(file.roster)
}
