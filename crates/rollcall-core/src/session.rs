//! The editing session.
//!
//! A [`Session`] ties the pieces together for one user: the roster catalog
//! read from the persistence collaborator, the active roster held by the
//! [`AutosaveController`], and the notification sink. Every user action
//! goes through here and produces exactly one notification (plus a warning
//! when an import dropped duplicates).
//!
//! Imports are split in two so the file read can happen asynchronously:
//! [`Session::begin_import`] hands out an [`ImportTicket`], and
//! [`Session::apply_import`] ignores the result if the active roster changed
//! in between.

use chrono::{DateTime, Utc};
use rollcall_ingest::{ImportOptions, RawRow, normalize_rows};
use rollcall_model::{Person, PersonId, Roster, RosterId};
use rollcall_persistence::{AutoSaveConfig, AutosaveController, RosterRepository, SaveState};
use serde::Deserialize;

use crate::error::{Result, SessionError};
use crate::export::ExportBundle;
use crate::notify::{Notification, NotificationSink, Severity};
use crate::ops::{self, ManualEntry};
use crate::summary::{AttendanceSummary, summarize};
use crate::view::RosterView;

/// Asked before unsaved changes are thrown away.
pub trait ConfirmDiscard {
    /// `true` to discard the pending changes of `roster`.
    fn confirm_discard(&mut self, roster: &Roster) -> bool;
}

impl<F: FnMut(&Roster) -> bool> ConfirmDiscard for F {
    fn confirm_discard(&mut self, roster: &Roster) -> bool {
        (*self)(roster)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub autosave: AutoSaveConfig,
    pub import: ImportOptions,
}

/// Proof that an import was started against a particular active roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTicket {
    roster_id: RosterId,
    generation: u64,
}

impl ImportTicket {
    pub fn roster_id(&self) -> &RosterId {
        &self.roster_id
    }
}

/// Counts reported after an import was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub duplicates_found: usize,
    pub already_in_roster: usize,
    pub incomplete_rows: usize,
}

pub struct Session<R, N> {
    repo: R,
    sink: N,
    catalog: Vec<Roster>,
    controller: AutosaveController,
    import_options: ImportOptions,
    /// Bumped whenever the active roster changes; stale tickets no longer match.
    generation: u64,
}

impl<R: RosterRepository, N: NotificationSink> Session<R, N> {
    /// Load the catalog. No roster is active afterwards.
    pub fn open(repo: R, sink: N, config: SessionConfig) -> Result<Self> {
        let catalog = repo.load_all()?;
        tracing::info!(rosters = catalog.len(), "session opened");
        Ok(Self {
            repo,
            sink,
            catalog,
            controller: AutosaveController::new(config.autosave),
            import_options: config.import,
            generation: 0,
        })
    }

    // === Accessors ===

    /// Rosters as last persisted, oldest first.
    pub fn rosters(&self) -> &[Roster] {
        &self.catalog
    }

    /// The active roster including unsaved changes.
    pub fn active(&self) -> Option<&Roster> {
        self.controller.roster()
    }

    pub fn state(&self) -> SaveState {
        self.controller.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.controller.is_dirty()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    /// Look a roster up by id, then by name ignoring case.
    pub fn find_roster(&self, key: &str) -> Option<&Roster> {
        let key = key.trim();
        self.catalog
            .iter()
            .find(|r| r.id().as_str() == key)
            .or_else(|| {
                let wanted = key.to_lowercase();
                self.catalog
                    .iter()
                    .find(|r| r.name().to_lowercase() == wanted)
            })
    }

    // === Roster catalog ===

    /// Create a roster, persist it and make it active.
    ///
    /// Returns `Ok(None)` when the user declined to discard unsaved changes.
    pub fn create_roster<C>(
        &mut self,
        name: &str,
        confirm: &mut C,
        now: DateTime<Utc>,
    ) -> Result<Option<RosterId>>
    where
        C: ConfirmDiscard + ?Sized,
    {
        if !self.may_switch(confirm) {
            tracing::debug!("roster creation cancelled");
            return Ok(None);
        }
        let roster = match ops::create_roster(name, now) {
            Ok(roster) => roster,
            Err(err) => return Err(self.fail(err.into())),
        };
        if let Err(err) = self.repo.save(&roster) {
            return Err(self.fail(err.into()));
        }

        let id = roster.id().clone();
        self.remember(roster.clone());
        self.activate(roster);
        tracing::info!(roster_id = %id, "roster created");
        self.report(Severity::Success, format!("Roster \"{}\" created", name.trim()));
        Ok(Some(id))
    }

    /// Make a stored roster the active one.
    ///
    /// Returns `false` when the user declined to discard unsaved changes.
    pub fn select_roster<C>(&mut self, id: &RosterId, confirm: &mut C) -> Result<bool>
    where
        C: ConfirmDiscard + ?Sized,
    {
        let Some(roster) = self.catalog.iter().find(|r| r.id() == id).cloned() else {
            return Err(self.fail(SessionError::RosterNotFound(id.to_string())));
        };
        if !self.may_switch(confirm) {
            tracing::debug!(roster_id = %id, "switch cancelled");
            return Ok(false);
        }

        let message = format!("Roster \"{}\" loaded", roster.name());
        self.activate(roster);
        tracing::info!(roster_id = %id, "roster selected");
        self.report(Severity::Info, message);
        Ok(true)
    }

    /// Delete a roster from storage. The active roster is closed if it was the one.
    pub fn delete_roster(&mut self, id: &RosterId) -> Result<()> {
        if !self.catalog.iter().any(|r| r.id() == id) {
            return Err(self.fail(SessionError::RosterNotFound(id.to_string())));
        }
        if let Err(err) = self.repo.delete(id) {
            return Err(self.fail(err.into()));
        }
        self.catalog.retain(|r| r.id() != id);
        if self.controller.roster().is_some_and(|r| r.id() == id) {
            self.controller.clear();
            self.generation += 1;
        }
        tracing::info!(roster_id = %id, "roster deleted");
        self.report(Severity::Success, "Roster deleted");
        Ok(())
    }

    // === Import ===

    /// Start an import into the active roster.
    pub fn begin_import(&mut self) -> Result<ImportTicket> {
        match self.controller.roster() {
            Some(roster) => Ok(ImportTicket {
                roster_id: roster.id().clone(),
                generation: self.generation,
            }),
            None => Err(self.fail(SessionError::NoActiveRoster)),
        }
    }

    /// Finish an import with the outcome of reading the file.
    ///
    /// Returns `Ok(None)` without touching anything if the ticket is stale.
    pub fn apply_import(
        &mut self,
        ticket: &ImportTicket,
        read: rollcall_ingest::Result<Vec<RawRow>>,
        now: DateTime<Utc>,
    ) -> Result<Option<ImportReport>> {
        let current = self
            .controller
            .roster()
            .filter(|r| ticket.generation == self.generation && r.id() == &ticket.roster_id)
            .cloned();
        let Some(roster) = current else {
            tracing::debug!(roster_id = %ticket.roster_id, "disregarding stale import");
            return Ok(None);
        };

        let rows = match read {
            Ok(rows) => rows,
            Err(err) => return Err(self.fail(err.into())),
        };
        let batch = match normalize_rows(&rows, &roster, self.import_options, now) {
            Ok(batch) => batch,
            Err(err) => return Err(self.fail(err.into())),
        };
        let report = ImportReport {
            added: batch.people.len(),
            duplicates_found: batch.duplicates_found,
            already_in_roster: batch.already_in_roster,
            incomplete_rows: batch.incomplete_rows,
        };
        let updated = match ops::append_imported(&roster, batch.people) {
            Ok(updated) => updated,
            Err(err) => return Err(self.fail(err.into())),
        };

        if report.duplicates_found > 0 {
            self.report(
                Severity::Warning,
                format!("Found and removed {} duplicate people", report.duplicates_found),
            );
        }
        let mut message = format!("{} people imported", report.added);
        if report.duplicates_found > 0 {
            message.push_str(&format!(
                ". {} duplicates removed automatically",
                report.duplicates_found
            ));
        }
        if report.already_in_roster > 0 {
            message.push_str(&format!(
                ". {} already on the roster",
                report.already_in_roster
            ));
        }
        self.report(Severity::Success, message);

        self.commit(updated, now);
        Ok(Some(report))
    }

    /// Import rows that are already in memory.
    pub fn import_rows(&mut self, rows: Vec<RawRow>, now: DateTime<Utc>) -> Result<ImportReport> {
        let ticket = self.begin_import()?;
        self.apply_import(&ticket, Ok(rows), now)?
            .ok_or(SessionError::NoActiveRoster)
    }

    // === People ===

    pub fn add_person(&mut self, entry: &ManualEntry, now: DateTime<Utc>) -> Result<PersonId> {
        let roster = self.require_active()?;
        let (updated, id) = match ops::add_manual(&roster, entry, now) {
            Ok(added) => added,
            Err(err) => return Err(self.fail(err.into())),
        };
        let message = updated
            .find(&id)
            .map(|p| format!("{} added as present", p.full_name()))
            .unwrap_or_default();
        self.report(Severity::Success, message);
        self.commit(updated, now);
        Ok(id)
    }

    /// Flip attendance. `Ok(None)` if the id is not on the active roster.
    pub fn toggle_attendance(&mut self, id: &PersonId, now: DateTime<Utc>) -> Result<Option<bool>> {
        let roster = self.require_active()?;
        let Some(updated) = ops::toggle_attendance(&roster, id) else {
            tracing::debug!(person_id = %id, "toggle on unknown person ignored");
            return Ok(None);
        };
        let present = updated.find(id).map(Person::present);
        if let Some(person) = updated.find(id) {
            let status = if person.present() { "present" } else { "absent" };
            self.report(
                Severity::Info,
                format!("{} marked as {status}", person.full_name()),
            );
        }
        self.commit(updated, now);
        Ok(present)
    }

    /// Remove a person. `Ok(None)` if the id is not on the active roster.
    pub fn delete_person(&mut self, id: &PersonId, now: DateTime<Utc>) -> Result<Option<Person>> {
        let roster = self.require_active()?;
        let Some((updated, removed)) = ops::delete_student(&roster, id) else {
            tracing::debug!(person_id = %id, "delete of unknown person ignored");
            return Ok(None);
        };
        self.report(
            Severity::Success,
            format!("{} removed from the roster", removed.full_name()),
        );
        self.commit(updated, now);
        Ok(Some(removed))
    }

    // === Saving ===

    /// Explicit save. Always writes, even when nothing changed.
    pub fn save(&mut self, now: DateTime<Utc>) -> Result<()> {
        match self.controller.save_now(&mut self.repo, now) {
            None => Err(self.fail(SessionError::NoActiveRoster)),
            Some(Ok(saved)) => {
                self.remember(saved);
                self.report(Severity::Success, "Roster saved");
                Ok(())
            }
            Some(Err(err)) => Err(self.fail(err.into())),
        }
    }

    /// Run a debounced auto-save if one is due.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Result<()>> {
        match self.controller.autosave(&mut self.repo, now)? {
            Ok(saved) => {
                self.remember(saved);
                Some(Ok(()))
            }
            Err(err) => {
                let err = SessionError::from(err);
                self.report(
                    Severity::Error,
                    format!("Automatic save failed: {}", err.user_message()),
                );
                Some(Err(err))
            }
        }
    }

    /// Persist pending changes, if any.
    pub fn flush(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.controller.is_dirty() {
            self.save(now)
        } else {
            Ok(())
        }
    }

    // === Projections ===

    /// Summary of the active roster; all zero without one.
    pub fn summary(&self) -> AttendanceSummary {
        self.controller.roster().map(summarize).unwrap_or_default()
    }

    pub fn view(&self, view: &RosterView) -> Vec<&Person> {
        self.controller
            .roster()
            .map(|r| view.apply(r))
            .unwrap_or_default()
    }

    pub fn export(&self, exported_at: DateTime<Utc>) -> Option<ExportBundle> {
        self.controller
            .roster()
            .map(|r| ExportBundle::build(r, &summarize(r), exported_at))
    }

    // === Internals ===

    fn may_switch<C: ConfirmDiscard + ?Sized>(&self, confirm: &mut C) -> bool {
        match self.controller.roster() {
            Some(active) if self.controller.is_dirty() => confirm.confirm_discard(active),
            _ => true,
        }
    }

    fn activate(&mut self, roster: Roster) {
        self.controller.load(roster);
        self.generation += 1;
    }

    fn require_active(&mut self) -> Result<Roster> {
        match self.controller.roster() {
            Some(roster) => Ok(roster.clone()),
            None => Err(self.fail(SessionError::NoActiveRoster)),
        }
    }

    fn commit(&mut self, roster: Roster, now: DateTime<Utc>) {
        self.controller.record_mutation(roster);
        if let Some(Err(err)) = self.tick(now) {
            tracing::debug!(
                error = %err.log_message(),
                "roster stays dirty after failed auto-save"
            );
        }
    }

    fn remember(&mut self, roster: Roster) {
        match self.catalog.iter_mut().find(|r| r.id() == roster.id()) {
            Some(slot) => *slot = roster,
            None => self.catalog.push(roster),
        }
    }

    fn report(&mut self, severity: Severity, message: impl Into<String>) {
        self.sink.notify(Notification::new(severity, message));
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        tracing::warn!(error = %err.log_message(), "session operation failed");
        self.report(Severity::Error, err.user_message());
        err
    }
}
