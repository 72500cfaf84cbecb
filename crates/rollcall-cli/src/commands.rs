//! Command execution.
//!
//! Every session operation reports its own outcome through the notification
//! sink, so a [`SessionError`] coming back from here has already been shown
//! to the user. Other errors (bad arguments, unknown roster, output files)
//! have not.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rollcall_core::{ExportBundle, NotificationSink, Session, Sheet};
use rollcall_ingest::read_import_file_async;
use rollcall_model::{PersonId, Roster, RosterId, redact_value};
use rollcall_persistence::{FileStore, RosterRepository};

use crate::cli::{Cli, Command, ExportArgs, ViewArgs};
use crate::settings::Settings;
use crate::shell;
use crate::sink::ConsoleSink;
use crate::summary::{format_rate, people_table, rosters_table, summary_table};

/// Run the parsed command line to completion.
pub fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let data_dir = settings.data_dir(cli.data_dir.as_deref());
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let mut session = Session::open(store, ConsoleSink, settings.session_config())
        .map_err(|e| anyhow!("failed to load rosters from {}: {e}", data_dir.display()))?;

    if let Command::Shell = cli.command {
        // The shell saves pending changes when it exits.
        return shell::run(&mut session, io::stdin().lock(), io::stdout().lock());
    }

    let outcome = execute(&mut session, &cli.command, &mut io::stdout().lock());
    let flushed = session.flush(Utc::now());
    outcome?;
    flushed?;
    Ok(())
}

/// Execute one non-interactive command.
pub fn execute<R, N, W>(session: &mut Session<R, N>, command: &Command, out: &mut W) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
    W: Write,
{
    match command {
        Command::Lists => print_rosters(session, out),
        Command::Create { name } => {
            session.create_roster(name, &mut |_: &Roster| true, Utc::now())?;
            Ok(())
        }
        Command::DeleteList { roster } => {
            let id = resolve_roster(session, roster)?;
            session.delete_roster(&id)?;
            Ok(())
        }
        Command::Import { roster, file } => {
            open_roster(session, roster)?;
            import_path(session, file)
        }
        Command::Add { roster, person } => {
            open_roster(session, roster)?;
            let entry = person.to_entry();
            tracing::debug!(
                given = redact_value(&entry.given_name),
                family = redact_value(&entry.family_name),
                "adding person"
            );
            session.add_person(&entry, Utc::now())?;
            Ok(())
        }
        Command::Toggle { roster, person } => {
            open_roster(session, roster)?;
            let id = parse_person_id(person)?;
            if session.toggle_attendance(&id, Utc::now())?.is_none() {
                return Err(anyhow!("no person with id {id} on this roster"));
            }
            Ok(())
        }
        Command::Remove { roster, person } => {
            open_roster(session, roster)?;
            let id = parse_person_id(person)?;
            if session.delete_person(&id, Utc::now())?.is_none() {
                return Err(anyhow!("no person with id {id} on this roster"));
            }
            Ok(())
        }
        Command::Show { roster, view } => {
            open_roster(session, roster)?;
            print_people(session, view, out)
        }
        Command::Summary { roster } => {
            open_roster(session, roster)?;
            print_summary(session, out)
        }
        Command::Export { roster, out: args } => {
            open_roster(session, roster)?;
            for path in export_to(session, args)? {
                writeln!(out, "wrote {}", path.display())?;
            }
            Ok(())
        }
        Command::Shell => Err(anyhow!("the shell cannot be started from here")),
    }
}

/// Find a roster by id or name.
pub(crate) fn resolve_roster<R, N>(session: &Session<R, N>, key: &str) -> Result<RosterId>
where
    R: RosterRepository,
    N: NotificationSink,
{
    session
        .find_roster(key)
        .map(|r| r.id().clone())
        .ok_or_else(|| anyhow!("no roster named or with id \"{key}\""))
}

/// Make `key` the active roster. Pending changes of a previous roster are kept
/// on disk by auto-save, so nothing is discarded silently.
fn open_roster<R, N>(session: &mut Session<R, N>, key: &str) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
{
    let id = resolve_roster(session, key)?;
    if session.active().is_some_and(|r| r.id() == &id) {
        return Ok(());
    }
    session.select_roster(&id, &mut |_: &Roster| true)?;
    Ok(())
}

pub(crate) fn parse_person_id(value: &str) -> Result<PersonId> {
    PersonId::new(value).with_context(|| format!("invalid person id \"{value}\""))
}

/// Import a file into the active roster, reading it off the calling thread.
pub(crate) fn import_path<R, N>(session: &mut Session<R, N>, path: &Path) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
{
    let ticket = session.begin_import()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start the file reader")?;
    let read = runtime
        .block_on(read_import_file_async(path.to_path_buf()))
        .map(|data| data.rows);
    if session.apply_import(&ticket, read, Utc::now())?.is_none() {
        tracing::debug!(path = %path.display(), "import result discarded");
    }
    Ok(())
}

pub(crate) fn print_rosters<R, N, W>(session: &Session<R, N>, out: &mut W) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
    W: Write,
{
    if session.rosters().is_empty() {
        writeln!(out, "No rosters yet. Create one with `create <name>`.")?;
    } else {
        writeln!(out, "{}", rosters_table(session.rosters()))?;
    }
    Ok(())
}

pub(crate) fn print_people<R, N, W>(
    session: &Session<R, N>,
    view: &ViewArgs,
    out: &mut W,
) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
    W: Write,
{
    let people = session.view(&view.to_view());
    if people.is_empty() {
        writeln!(out, "Nobody to show.")?;
    } else {
        writeln!(out, "{}", people_table(&people))?;
    }
    Ok(())
}

pub(crate) fn print_summary<R, N, W>(session: &Session<R, N>, out: &mut W) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
    W: Write,
{
    let summary = session.summary();
    writeln!(out, "{}", summary_table(&summary))?;
    writeln!(out, "Attendance: {}", format_rate(&summary))?;
    Ok(())
}

/// Write both export sheets of the active roster and return the paths written.
pub(crate) fn export_to<R, N>(session: &Session<R, N>, args: &ExportArgs) -> Result<Vec<PathBuf>>
where
    R: RosterRepository,
    N: NotificationSink,
{
    let bundle = session
        .export(Utc::now())
        .ok_or_else(|| anyhow!("no roster is selected"))?;
    let dir = args.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    write_bundle(&bundle, &dir)
}

fn write_bundle(bundle: &ExportBundle, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);
    for (suffix, sheet) in [("people", &bundle.people), ("summary", &bundle.summary)] {
        let path = dir.join(format!("{}_{suffix}.csv", bundle.file_stem));
        write_sheet(sheet, &path).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = sheet.rows.len(), "exported sheet");
        written.push(path);
    }
    Ok(written)
}

fn write_sheet(sheet: &Sheet, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    sheet.write_csv(&mut writer)?;
    writer.flush()?;
    Ok(())
}
