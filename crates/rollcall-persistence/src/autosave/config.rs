//! Auto-save configuration.

use serde::{Deserialize, Serialize};

/// Configuration for auto-save behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether auto-save is enabled.
    pub enabled: bool,

    /// Debounce delay in milliseconds.
    ///
    /// After a change, the system waits this long before saving.
    /// Additional changes reset the timer. Zero persists every change
    /// as soon as it is recorded.
    pub debounce_ms: u64,

    /// Maximum delay before forcing a save.
    ///
    /// If changes keep coming, save after this many milliseconds
    /// since the first unsaved change.
    pub max_delay_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 0,
            max_delay_ms: 30_000,
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled auto-save config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Debounced config, as used by the interactive shell.
    pub fn debounced(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            ..Default::default()
        }
    }

    /// Check if auto-save should trigger given the time since last change
    /// and time since first unsaved change.
    pub fn should_save(&self, since_last_change_ms: u64, since_first_unsaved_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }

        since_last_change_ms >= self.debounce_ms || since_first_unsaved_ms >= self.max_delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_saves_immediately() {
        let config = AutoSaveConfig::default();
        assert!(config.enabled);
        assert_eq!(config.debounce_ms, 0);
        assert!(config.should_save(0, 0));
    }

    #[test]
    fn test_should_save_disabled() {
        let config = AutoSaveConfig::disabled();
        assert!(!config.should_save(10_000, 60_000));
    }

    #[test]
    fn test_should_save_debounce() {
        let config = AutoSaveConfig::debounced(2000);
        assert!(!config.should_save(1000, 1000));
        assert!(config.should_save(2500, 2500));
    }

    #[test]
    fn test_should_save_max_delay() {
        let config = AutoSaveConfig::debounced(2000);
        assert!(!config.should_save(500, 25_000));
        assert!(config.should_save(500, 35_000));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AutoSaveConfig = serde_json::from_str(r#"{"debounce_ms": 750}"#).unwrap();
        assert_eq!(config, AutoSaveConfig::debounced(750));
    }
}
