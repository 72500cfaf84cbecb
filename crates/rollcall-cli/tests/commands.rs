//! One-shot commands driven against an in-memory store.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use rollcall_cli::cli::{Cli, Command};
use rollcall_cli::commands::execute;
use rollcall_core::{NotificationLog, Session, SessionConfig, SessionError, Severity};
use rollcall_persistence::MemoryStore;
use tempfile::tempdir;

type TestSession = Session<MemoryStore, NotificationLog>;

fn session() -> TestSession {
    Session::open(
        MemoryStore::new(),
        NotificationLog::new(),
        SessionConfig::default(),
    )
    .unwrap()
}

fn command(args: &[&str]) -> Command {
    let mut argv = vec!["rollcall"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

fn exec(session: &mut TestSession, args: &[&str]) -> anyhow::Result<String> {
    let mut out = Vec::new();
    execute(session, &command(args), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn create_add_and_show() {
    let mut session = session();
    exec(&mut session, &["create", "Grupo A"]).unwrap();
    exec(
        &mut session,
        &["add", "grupo a", "--given", "Ana", "--family", "García"],
    )
    .unwrap();
    exec(
        &mut session,
        &["add", "Grupo A", "--given", "Luis", "--family", "Soto"],
    )
    .unwrap();

    let shown = exec(&mut session, &["show", "Grupo A", "--sort", "given", "--desc"]).unwrap();
    let luis = shown.find("Luis").unwrap();
    let ana = shown.find("Ana").unwrap();
    assert!(luis < ana);

    let summary = exec(&mut session, &["summary", "Grupo A"]).unwrap();
    assert!(summary.contains("Attendance: 100.0%"));
    assert_eq!(
        session.sink().severities(),
        vec![Severity::Success, Severity::Success, Severity::Success]
    );
}

#[test]
fn unknown_roster_is_not_a_session_error() {
    let mut session = session();
    let err = exec(&mut session, &["summary", "Nadie"]).unwrap_err();
    assert!(err.downcast_ref::<SessionError>().is_none());
    assert!(err.to_string().contains("Nadie"));
    assert!(session.sink().is_empty());
}

#[test]
fn toggle_then_remove_by_id() {
    let mut session = session();
    exec(&mut session, &["create", "Grupo A"]).unwrap();
    exec(
        &mut session,
        &["add", "Grupo A", "--given", "Ana", "--family", "García"],
    )
    .unwrap();
    let id = session.active().unwrap().people()[0].id().to_string();

    exec(&mut session, &["toggle", "Grupo A", id.as_str()]).unwrap();
    assert!(!session.active().unwrap().people()[0].present());

    exec(&mut session, &["remove", "Grupo A", id.as_str()]).unwrap();
    assert!(session.active().unwrap().is_empty());

    let err = exec(&mut session, &["toggle", "Grupo A", id.as_str()]).unwrap_err();
    assert!(err.to_string().contains("no person with id"));
}

#[test]
fn import_csv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("alumnos.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Nombre,Segundo nombre,Apellido,Segundo apellido").unwrap();
    writeln!(file, "Luis,,Soto,").unwrap();
    writeln!(file, "Ana,María,Abad,Ruiz").unwrap();
    writeln!(file, "Luis,,Soto,").unwrap();
    drop(file);

    let mut session = session();
    exec(&mut session, &["create", "Grupo A"]).unwrap();
    let path_arg = path.to_string_lossy().into_owned();
    exec(&mut session, &["import", "Grupo A", path_arg.as_str()]).unwrap();

    let roster = session.active().unwrap();
    assert_eq!(roster.len(), 2);
    assert!(roster.people().iter().all(|p| !p.present()));
    let messages: Vec<_> = session
        .sink()
        .entries()
        .iter()
        .map(|n| n.message.as_str())
        .collect();
    assert_eq!(
        messages[1..],
        [
            "Found and removed 1 duplicate people",
            "2 people imported. 1 duplicates removed automatically",
        ]
    );
}

#[test]
fn import_of_unsupported_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let mut session = session();
    exec(&mut session, &["create", "Grupo A"]).unwrap();
    let path_arg = path.to_string_lossy().into_owned();
    let err = exec(&mut session, &["import", "Grupo A", path_arg.as_str()]).unwrap_err();

    assert!(err.downcast_ref::<SessionError>().is_some());
    assert_eq!(session.sink().last().unwrap().severity, Severity::Error);
    assert!(session.active().unwrap().is_empty());
}

#[test]
fn export_writes_both_sheets() {
    let out_dir = tempdir().unwrap();
    let mut session = session();
    exec(&mut session, &["create", "Grupo A"]).unwrap();
    exec(
        &mut session,
        &["add", "Grupo A", "--given", "Ana", "--family", "García"],
    )
    .unwrap();

    let out_arg = out_dir.path().to_string_lossy().into_owned();
    let printed = exec(&mut session, &["export", "Grupo A", "--out-dir", out_arg.as_str()]).unwrap();
    assert_eq!(printed.lines().count(), 2);

    let mut written: Vec<PathBuf> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    written.sort();
    assert_eq!(written.len(), 2);
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names[0].starts_with("Grupo A_") && names[0].ends_with("_people.csv"));
    assert!(names[1].ends_with("_summary.csv"));

    let people = std::fs::read_to_string(&written[0]).unwrap();
    assert!(people.starts_with("No.,Given name,Family name"));
    assert!(people.contains("Ana,García"));
}

#[test]
fn delete_list_removes_from_catalog() {
    let mut session = session();
    exec(&mut session, &["create", "Grupo A"]).unwrap();
    exec(&mut session, &["create", "Grupo B"]).unwrap();
    exec(&mut session, &["delete-list", "Grupo A"]).unwrap();

    let listed = exec(&mut session, &["lists"]).unwrap();
    assert!(listed.contains("Grupo B"));
    assert!(!listed.contains("Grupo A"));
    assert_eq!(session.repository().len(), 1);
}
