//! The Autosave Controller.

use chrono::{DateTime, Utc};
use rollcall_model::Roster;

use super::{AutoSaveConfig, DirtyTracker, SaveState};
use crate::error::Result;
use crate::store::RosterRepository;

/// Owns the active roster and decides when it is written.
///
/// Mutations are recorded with [`record_mutation`](Self::record_mutation),
/// which only marks the roster dirty. Writing happens in
/// [`autosave`](Self::autosave) once the debounce allows it, or immediately
/// through [`save_now`](Self::save_now). A failed write keeps the roster
/// dirty and in memory; auto-save does not retry it until the next change.
#[derive(Debug, Clone)]
pub struct AutosaveController {
    config: AutoSaveConfig,
    tracker: DirtyTracker,
    roster: Option<Roster>,
}

impl AutosaveController {
    pub fn new(config: AutoSaveConfig) -> Self {
        Self {
            config,
            tracker: DirtyTracker::new(),
            roster: None,
        }
    }

    /// Start tracking `roster` as freshly loaded or created. State is Clean.
    pub fn load(&mut self, roster: Roster) {
        tracing::debug!(roster_id = %roster.id(), "tracking roster");
        self.roster = Some(roster);
        self.tracker = DirtyTracker::new();
    }

    /// Stop tracking the active roster, dropping any pending changes.
    pub fn clear(&mut self) -> Option<Roster> {
        self.tracker = DirtyTracker::new();
        self.roster.take()
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn state(&self) -> SaveState {
        self.tracker.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Replace the tracked roster with the result of a mutation.
    pub fn record_mutation(&mut self, roster: Roster) {
        self.roster = Some(roster);
        self.tracker.mark_dirty();
    }

    /// Whether [`autosave`](Self::autosave) would write right now.
    pub fn autosave_due(&self) -> bool {
        self.roster.is_some() && self.tracker.should_auto_save(&self.config)
    }

    /// Persist the roster if auto-save is due.
    ///
    /// Returns `None` when nothing was attempted, otherwise the outcome of
    /// the write with the stamped roster on success.
    pub fn autosave<R>(&mut self, repo: &mut R, now: DateTime<Utc>) -> Option<Result<Roster>>
    where
        R: RosterRepository + ?Sized,
    {
        if !self.autosave_due() {
            return None;
        }
        self.persist(repo, now)
    }

    /// Persist the roster regardless of state. `None` without an active roster.
    pub fn save_now<R>(&mut self, repo: &mut R, now: DateTime<Utc>) -> Option<Result<Roster>>
    where
        R: RosterRepository + ?Sized,
    {
        self.persist(repo, now)
    }

    fn persist<R>(&mut self, repo: &mut R, now: DateTime<Utc>) -> Option<Result<Roster>>
    where
        R: RosterRepository + ?Sized,
    {
        let stamped = self.roster.as_ref()?.touched(now);

        self.tracker.start_save();
        match repo.save(&stamped) {
            Ok(()) => {
                self.tracker.save_complete();
                self.roster = Some(stamped.clone());
                tracing::info!(
                    roster_id = %stamped.id(),
                    people = stamped.len(),
                    "roster saved"
                );
                Some(Ok(stamped))
            }
            Err(err) => {
                self.tracker.save_failed();
                tracing::warn!(
                    roster_id = %stamped.id(),
                    error = %err,
                    "roster save failed; changes kept in memory"
                );
                Some(Err(err))
            }
        }
    }
}
