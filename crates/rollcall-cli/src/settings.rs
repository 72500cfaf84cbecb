//! User settings, read from a TOML file.
//!
//! ```toml
//! [storage]
//! data_dir = "/home/me/rosters"
//!
//! [autosave]
//! enabled = true
//! debounce_ms = 0
//! max_delay_ms = 30000
//!
//! [import]
//! dedup_against_roster = false
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rollcall_core::SessionConfig;
use rollcall_ingest::ImportOptions;
use rollcall_persistence::AutoSaveConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "rollcall";
const APPLICATION: &str = "rollcall";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub autosave: AutoSaveConfig,
    pub import: ImportOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where roster files live. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    /// Load from `explicit`, or from the default location.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Self::parse(&content, path)
            }
            None => match Self::config_path() {
                Some(path) => Self::load_from(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(SettingsError::Read {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings = toml::from_str(content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Default settings file location.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Data directory: the override, then the file, then the platform default.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.storage.data_dir.clone())
            .or_else(|| {
                directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
                    .map(|dirs| dirs.data_dir().join("rosters"))
            })
            .unwrap_or_else(|| PathBuf::from("rollcall-data"))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            autosave: self.autosave.clone(),
            import: self.import,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[autosave]\ndebounce_ms = 1500\n\n[import]\ndedup_against_roster = true\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.autosave.debounce_ms, 1500);
        assert!(settings.autosave.enabled);
        assert_eq!(settings.autosave.max_delay_ms, 30_000);
        assert!(settings.import.dedup_against_roster);
        assert_eq!(settings.storage.data_dir, None);
    }

    #[test]
    fn test_missing_default_file_is_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Settings::load(Some(&dir.path().join("absent.toml"))),
            Err(SettingsError::Read { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[autosave]\ndebounce_ms = \"soon\"\n").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_data_dir_precedence() {
        let settings = Settings {
            storage: StorageSettings {
                data_dir: Some(PathBuf::from("/from/file")),
            },
            ..Settings::default()
        };
        assert_eq!(
            settings.data_dir(Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(settings.data_dir(None), PathBuf::from("/from/file"));
    }
}
