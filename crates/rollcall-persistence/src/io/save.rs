//! Roster saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rollcall_model::Roster;

use crate::convert::ToSnapshot;
use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, MAGIC_BYTES, ROSTER_FILE_EXTENSION, RosterFile};

/// Save a roster to a .roll file.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written roster behind.
pub fn save_roster_file(roster: &Roster, path: &Path) -> Result<()> {
    let bytes = encode_roster(roster)?;

    let temp_path = path.with_extension(format!("{ROSTER_FILE_EXTENSION}.tmp"));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(
        roster_id = %roster.id(),
        people = roster.len(),
        path = %path.display(),
        "saved roster file"
    );
    Ok(())
}

/// Save a roster on the blocking thread pool.
pub async fn save_roster_file_async(roster: Roster, path: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || save_roster_file(&roster, &path))
        .await
        .map_err(|e| PersistenceError::Serialization {
            source: Box::new(e),
        })?
}

/// Encode a roster to the on-disk byte layout.
///
/// Format:
/// - 4 bytes: Magic ("RCL\x01")
/// - 4 bytes: Schema version (u32 little-endian)
/// - N bytes: rkyv payload
pub fn encode_roster(roster: &Roster) -> Result<Vec<u8>> {
    let file = RosterFile::new(roster.to_snapshot());
    let rkyv_bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&file).map_err(|e| {
        PersistenceError::Serialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv serialization failed: {e}"
            ))),
        }
    })?;

    let mut output = Vec::with_capacity(8 + rkyv_bytes.len());
    output.extend_from_slice(&MAGIC_BYTES);
    output.extend_from_slice(&CURRENT_SCHEMA_VERSION.to_le_bytes());
    output.extend_from_slice(&rkyv_bytes);

    Ok(output)
}
