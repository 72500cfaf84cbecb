use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rollcall_model::{Roster, RosterId};

use super::{RosterRepository, sort_catalog};
use crate::error::{PersistenceError, Result};
use crate::io::{load_roster_file, save_roster_file};
use crate::types::ROSTER_FILE_EXTENSION;

/// One `<roster-id>.roll` file per roster inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: dir.clone(),
            source: e,
        })?;
        tracing::debug!(path = %dir.display(), "opened roster store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds roster `id`.
    pub fn path_for(&self, id: &RosterId) -> Result<PathBuf> {
        let safe = id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(PersistenceError::InvalidRecord {
                reason: format!("roster id {:?} cannot be used as a file name", id.as_str()),
            });
        }
        Ok(self
            .dir
            .join(format!("{}.{ROSTER_FILE_EXTENSION}", id.as_str())))
    }
}

impl RosterRepository for FileStore {
    fn save(&mut self, roster: &Roster) -> Result<()> {
        let path = self.path_for(roster.id())?;
        save_roster_file(roster, &path)
    }

    fn load_all(&self) -> Result<Vec<Roster>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| PersistenceError::Io {
            operation: "read",
            path: self.dir.clone(),
            source: e,
        })?;

        let mut rosters = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PersistenceError::Io {
                operation: "read",
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let is_roster = path
                .extension()
                .is_some_and(|ext| ext == ROSTER_FILE_EXTENSION);
            if is_roster && path.is_file() {
                rosters.push(load_roster_file(&path)?);
            }
        }

        sort_catalog(&mut rosters);
        tracing::debug!(path = %self.dir.display(), rosters = rosters.len(), "loaded roster catalog");
        Ok(rosters)
    }

    fn delete(&mut self, id: &RosterId) -> Result<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(roster_id = %id, path = %path.display(), "deleted roster file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Io {
                operation: "delete",
                path,
                source: e,
            }),
        }
    }
}
