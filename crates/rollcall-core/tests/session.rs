//! End-to-end behavior of the editing session.

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rollcall_core::{
    ManualEntry, NotificationLog, RosterView, Session, SessionConfig, SessionError, Severity,
};
use rollcall_ingest::read_import_file_async;
use rollcall_model::{Roster, RosterError, RosterId};
use rollcall_persistence::{
    AutoSaveConfig, FileStore, MemoryStore, PersistenceError, RosterRepository, SaveState,
};
use tempfile::tempdir;

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn reference_rows() -> Vec<Vec<String>> {
    rows(&[
        &["H1", "H2", "H3", "H4"],
        &["Ana", "", "García", "Pérez"],
        &["ana", "", "garcía", "pérez"],
        &["", "", "Solo", ""],
    ])
}

fn keep(_: &Roster) -> bool {
    false
}

fn discard(_: &Roster) -> bool {
    true
}

/// A memory store whose writes can be switched off from outside.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: Rc<Cell<bool>>,
}

impl RosterRepository for FlakyStore {
    fn save(&mut self, roster: &Roster) -> rollcall_persistence::Result<()> {
        if self.failing.get() {
            return Err(PersistenceError::Io {
                operation: "write",
                path: "/full/disk.roll".into(),
                source: std::io::Error::other("no space left on device"),
            });
        }
        self.inner.save(roster)
    }

    fn load_all(&self) -> rollcall_persistence::Result<Vec<Roster>> {
        self.inner.load_all()
    }

    fn delete(&mut self, id: &RosterId) -> rollcall_persistence::Result<()> {
        self.inner.delete(id)
    }
}

fn memory_session() -> Session<MemoryStore, NotificationLog> {
    Session::open(MemoryStore::new(), NotificationLog::new(), SessionConfig::default()).unwrap()
}

#[test]
fn create_roster_persists_and_activates() {
    let mut session = memory_session();
    let id = session
        .create_roster("Grupo A", &mut discard, at(0))
        .unwrap()
        .unwrap();

    assert_eq!(session.active().map(Roster::id), Some(&id));
    assert_eq!(session.state(), SaveState::Clean);
    assert_eq!(session.rosters().len(), 1);
    assert!(session.repository().get(&id).is_some());
    assert_eq!(session.sink().severities(), [Severity::Success]);
}

#[test]
fn create_roster_with_blank_name_notifies_error() {
    let mut session = memory_session();
    let err = session.create_roster("   ", &mut discard, at(0)).unwrap_err();

    assert!(matches!(err, SessionError::Roster(RosterError::EmptyRosterName)));
    assert!(session.active().is_none());
    assert_eq!(session.sink().severities(), [Severity::Error]);
}

#[test]
fn import_reference_rows_and_autosave() {
    let mut session = memory_session();
    let id = session
        .create_roster("Grupo A", &mut discard, at(0))
        .unwrap()
        .unwrap();
    session.sink_mut().drain();

    let report = session.import_rows(reference_rows(), at(1)).unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.duplicates_found, 1);
    assert_eq!(report.incomplete_rows, 1);
    assert_eq!(
        session.sink().severities(),
        [Severity::Warning, Severity::Success]
    );

    // Default config persists immediately.
    assert_eq!(session.state(), SaveState::Clean);
    let stored = session.repository().get(&id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.people()[0].given_name(), "Ana");
    assert_eq!(stored.people()[0].family_name(), "García Pérez");
    assert!(!stored.people()[0].present());
    assert_eq!(stored.modified_at(), at(1));
}

#[test]
fn manual_duplicate_is_rejected_without_mutation() {
    let mut session = memory_session();
    session.create_roster("Grupo A", &mut discard, at(0)).unwrap();
    session.import_rows(reference_rows(), at(1)).unwrap();
    let before = session.active().cloned().unwrap();
    session.sink_mut().drain();

    let err = session
        .add_person(&ManualEntry::new("Ana", "García Pérez"), at(2))
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Roster(RosterError::DuplicatePerson { .. })
    ));
    assert_eq!(session.active(), Some(&before));
    assert_eq!(session.sink().severities(), [Severity::Error]);
}

#[test]
fn add_toggle_delete_emit_one_notification_each() {
    let mut session = memory_session();
    session.create_roster("Grupo A", &mut discard, at(0)).unwrap();
    session.sink_mut().drain();

    let id = session
        .add_person(&ManualEntry::new("Luis", "Soto").phone("600123123"), at(1))
        .unwrap();
    assert_eq!(session.toggle_attendance(&id, at(2)).unwrap(), Some(false));
    assert_eq!(session.toggle_attendance(&id, at(3)).unwrap(), Some(true));
    let removed = session.delete_person(&id, at(4)).unwrap().unwrap();

    assert_eq!(removed.full_name(), "Luis Soto");
    assert!(session.active().unwrap().is_empty());
    assert_eq!(
        session.sink().severities(),
        [Severity::Success, Severity::Info, Severity::Info, Severity::Success]
    );
    let messages: Vec<_> = session
        .sink()
        .entries()
        .iter()
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(messages[1], "Luis Soto marked as absent");
}

#[test]
fn unknown_person_is_a_silent_no_op() {
    let mut session = memory_session();
    session.create_roster("Grupo A", &mut discard, at(0)).unwrap();
    session.sink_mut().drain();
    let missing = rollcall_model::PersonId::manual(1);

    assert_eq!(session.toggle_attendance(&missing, at(1)).unwrap(), None);
    assert!(session.delete_person(&missing, at(1)).unwrap().is_none());
    assert_eq!(session.state(), SaveState::Clean);
    assert!(session.sink().is_empty());
}

#[test]
fn mutations_need_an_active_roster() {
    let mut session = memory_session();
    assert!(matches!(
        session.add_person(&ManualEntry::new("Ana", "Abad"), at(0)),
        Err(SessionError::NoActiveRoster)
    ));
    assert!(matches!(session.begin_import(), Err(SessionError::NoActiveRoster)));
    assert!(matches!(session.save(at(0)), Err(SessionError::NoActiveRoster)));
    assert_eq!(
        session.sink().last().map(|n| n.message.as_str()),
        Some("Create or select a roster first")
    );
}

#[test]
fn failed_save_keeps_changes_until_explicit_save() {
    let failing = Rc::new(Cell::new(false));
    let store = FlakyStore {
        inner: MemoryStore::new(),
        failing: Rc::clone(&failing),
    };
    let mut session = Session::open(store, NotificationLog::new(), SessionConfig::default()).unwrap();
    let roster_id = session
        .create_roster("Grupo A", &mut discard, at(0))
        .unwrap()
        .unwrap();
    session.sink_mut().drain();

    failing.set(true);
    let person = session
        .add_person(&ManualEntry::new("Ana", "Abad"), at(1))
        .unwrap();
    assert_eq!(session.state(), SaveState::Dirty);
    assert_eq!(session.sink().severities(), [Severity::Success, Severity::Error]);
    assert!(session.active().unwrap().find(&person).is_some());

    // Auto-save does not retry on its own.
    assert!(session.tick(at(2)).is_none());

    failing.set(false);
    session.save(at(3)).unwrap();
    assert_eq!(session.state(), SaveState::Clean);
    let stored = session.repository().inner.get(&roster_id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.modified_at(), at(3));
}

#[test]
fn switching_while_dirty_asks_first() {
    let config = SessionConfig {
        autosave: AutoSaveConfig::debounced(60_000),
        ..SessionConfig::default()
    };
    let mut session = Session::open(MemoryStore::new(), NotificationLog::new(), config).unwrap();
    let first = session
        .create_roster("Lunes", &mut discard, at(0))
        .unwrap()
        .unwrap();
    let second = session
        .create_roster("Martes", &mut discard, at(1))
        .unwrap()
        .unwrap();
    session.select_roster(&first, &mut discard).unwrap();
    session
        .add_person(&ManualEntry::new("Ana", "Abad"), at(2))
        .unwrap();
    assert!(session.is_dirty());

    let mut asked = 0;
    let mut decline = |_: &Roster| {
        asked += 1;
        false
    };
    assert!(!session.select_roster(&second, &mut decline).unwrap());
    assert_eq!(asked, 1);
    assert_eq!(session.active().map(Roster::id), Some(&first));
    assert!(session.create_roster("Miércoles", &mut keep, at(3)).unwrap().is_none());

    assert!(session.select_roster(&second, &mut discard).unwrap());
    assert_eq!(session.active().map(Roster::id), Some(&second));
    assert_eq!(session.state(), SaveState::Clean);
    // The discarded addition never reached storage.
    assert!(session.repository().get(&first).unwrap().is_empty());
}

#[test]
fn stale_import_ticket_is_disregarded() {
    let mut session = memory_session();
    let first = session
        .create_roster("Lunes", &mut discard, at(0))
        .unwrap()
        .unwrap();
    let ticket = session.begin_import().unwrap();
    assert_eq!(ticket.roster_id(), &first);

    session.create_roster("Martes", &mut discard, at(1)).unwrap();
    session.sink_mut().drain();

    assert_eq!(
        session.apply_import(&ticket, Ok(reference_rows()), at(2)).unwrap(),
        None
    );
    assert!(session.active().unwrap().is_empty());
    assert!(session.repository().get(&first).unwrap().is_empty());
    assert!(session.sink().is_empty());
}

#[test]
fn deleting_active_roster_closes_it() {
    let mut session = memory_session();
    let id = session
        .create_roster("Lunes", &mut discard, at(0))
        .unwrap()
        .unwrap();
    session.delete_roster(&id).unwrap();

    assert!(session.active().is_none());
    assert!(session.rosters().is_empty());
    assert!(session.repository().is_empty());
    assert_eq!(session.summary(), Default::default());
}

#[test]
fn delete_unknown_roster_fails() {
    let mut session = memory_session();
    let id = session
        .create_roster("Lunes", &mut discard, at(0))
        .unwrap()
        .unwrap();
    session.delete_roster(&id).unwrap();
    session.sink_mut().drain();

    let err = session.delete_roster(&id).unwrap_err();
    assert!(matches!(err, SessionError::RosterNotFound(_)));
    assert_eq!(session.sink().severities(), [Severity::Error]);

    let err = session.delete_roster(&RosterId::generate()).unwrap_err();
    assert!(matches!(err, SessionError::RosterNotFound(_)));
    assert!(
        session
            .sink()
            .entries()
            .iter()
            .all(|n| n.message != "Roster deleted")
    );
}

#[test]
fn select_unknown_roster_fails() {
    let mut session = memory_session();
    let err = session
        .select_roster(&RosterId::generate(), &mut discard)
        .unwrap_err();
    assert!(matches!(err, SessionError::RosterNotFound(_)));
    assert_eq!(session.sink().severities(), [Severity::Error]);
}

#[test]
fn file_backed_session_survives_restart() {
    let dir = tempdir().unwrap();
    let id = {
        let store = FileStore::open(dir.path()).unwrap();
        let mut session = Session::open(store, NotificationLog::new(), SessionConfig::default()).unwrap();
        let id = session
            .create_roster("Grupo A", &mut discard, at(0))
            .unwrap()
            .unwrap();
        session.import_rows(reference_rows(), at(1)).unwrap();
        session
            .add_person(&ManualEntry::new("Luis", "Soto"), at(2))
            .unwrap();
        id
    };

    let store = FileStore::open(dir.path()).unwrap();
    let mut session = Session::open(store, NotificationLog::new(), SessionConfig::default()).unwrap();
    let found = session.find_roster("grupo a").unwrap().id().clone();
    assert_eq!(found, id);
    session.select_roster(&id, &mut discard).unwrap();

    let summary = session.summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.present_manual, 1);
    assert_eq!(summary.absent_from_import, 1);

    let shown: Vec<_> = session
        .view(&RosterView::default())
        .iter()
        .map(|p| p.full_name())
        .collect();
    assert_eq!(shown, ["Ana García Pérez", "Luis Soto"]);
}

#[tokio::test]
async fn async_read_then_apply() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("alumnos.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Nombre,Segundo nombre,Apellido,Segundo apellido").unwrap();
    writeln!(file, "Luis,,Soto,").unwrap();
    writeln!(file, "Ana,María,Abad,Ruiz").unwrap();
    drop(file);

    let mut session = memory_session();
    session.create_roster("Grupo A", &mut discard, at(0)).unwrap();
    let ticket = session.begin_import().unwrap();

    let read = read_import_file_async(path).await.map(|data| data.rows);
    let report = session.apply_import(&ticket, read, at(1)).unwrap().unwrap();

    assert_eq!(report.added, 2);
    let names: Vec<_> = session
        .active()
        .unwrap()
        .people()
        .iter()
        .map(|p| p.full_name())
        .collect();
    assert_eq!(names, ["Ana María Abad Ruiz", "Luis Soto"]);
}

#[test]
fn failed_read_rejects_whole_batch() {
    let mut session = memory_session();
    session.create_roster("Grupo A", &mut discard, at(0)).unwrap();
    session.sink_mut().drain();
    let ticket = session.begin_import().unwrap();

    let dir = tempdir().unwrap();
    let read = rollcall_ingest::read_import_file(&dir.path().join("missing.csv")).map(|d| d.rows);
    let err = session.apply_import(&ticket, read, at(1)).unwrap_err();

    assert!(matches!(err, SessionError::Ingest(_)));
    assert!(session.active().unwrap().is_empty());
    assert_eq!(session.sink().severities(), [Severity::Error]);
}

#[test]
fn export_uses_active_roster() {
    let mut session = memory_session();
    assert!(session.export(at(0)).is_none());
    session.create_roster("Grupo A", &mut discard, at(0)).unwrap();
    session.import_rows(reference_rows(), at(1)).unwrap();

    let bundle = session.export(at(60 * 24)).unwrap();
    assert_eq!(bundle.file_stem, "Grupo A_2024-03-02");
    assert_eq!(bundle.people.rows.len(), 1);
}
