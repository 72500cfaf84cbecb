//! Dirty state tracking for auto-save.

use std::time::Instant;

/// Whether the in-memory roster has changes that are not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveState {
    Clean,
    Dirty,
}

/// Tracks unsaved changes in a roster.
///
/// Used to implement debounced auto-save and the "unsaved changes" indicator.
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    /// Whether there are unsaved changes.
    dirty: bool,

    /// When the most recent change was made.
    last_change: Option<Instant>,

    /// When the first unsaved change was made.
    /// Reset when saved.
    first_unsaved_change: Option<Instant>,

    /// Whether a save is currently in progress.
    saving: bool,

    /// Set by a failed save, cleared by the next change. Auto-save stays
    /// quiet until then; an explicit save still goes through.
    failed: bool,
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self {
            dirty: false,
            last_change: None,
            first_unsaved_change: None,
            saving: false,
            failed: false,
        }
    }

    #[inline]
    pub fn state(&self) -> SaveState {
        if self.dirty {
            SaveState::Dirty
        } else {
            SaveState::Clean
        }
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if a save is in progress.
    #[inline]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether the last save attempt failed and nothing changed since.
    #[inline]
    pub fn last_save_failed(&self) -> bool {
        self.failed
    }

    /// Mark the roster as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        let now = Instant::now();
        self.dirty = true;
        self.failed = false;
        self.last_change = Some(now);

        if self.first_unsaved_change.is_none() {
            self.first_unsaved_change = Some(now);
        }
    }

    /// Mark that a save has started.
    pub fn start_save(&mut self) {
        self.saving = true;
    }

    /// Mark that a save has completed successfully.
    pub fn save_complete(&mut self) {
        self.dirty = false;
        self.saving = false;
        self.failed = false;
        self.first_unsaved_change = None;
    }

    /// Mark that a save has failed. The roster stays dirty.
    pub fn save_failed(&mut self) {
        self.saving = false;
        self.failed = true;
    }

    /// Get milliseconds since the last change.
    pub fn ms_since_last_change(&self) -> Option<u64> {
        self.last_change.map(elapsed_ms)
    }

    /// Get milliseconds since the first unsaved change.
    pub fn ms_since_first_unsaved(&self) -> Option<u64> {
        self.first_unsaved_change.map(elapsed_ms)
    }

    /// Check if auto-save should trigger based on the config.
    pub fn should_auto_save(&self, config: &super::AutoSaveConfig) -> bool {
        if !self.dirty || self.saving || self.failed || !config.enabled {
            return false;
        }

        match (self.ms_since_last_change(), self.ms_since_first_unsaved()) {
            (Some(since_last), Some(since_first)) => config.should_save(since_last, since_first),
            _ => false,
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}
