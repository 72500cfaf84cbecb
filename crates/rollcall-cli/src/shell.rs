//! Interactive shell.
//!
//! Reads one command per line, keeps a roster open between lines and runs the
//! auto-save check after each one. Lines are split like a POSIX shell would
//! for quoting, then parsed with clap.

use std::io::{BufRead, Write};

use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rollcall_core::{ConfirmDiscard, NotificationSink, Session, SessionError};
use rollcall_model::Roster;
use rollcall_persistence::{RosterRepository, SaveState};

use crate::cli::{ExportArgs, PersonArgs, ViewArgs};
use crate::commands::{
    export_to, import_path, parse_person_id, print_people, print_rosters, print_summary,
    resolve_roster,
};

#[derive(Parser, Debug)]
#[command(
    name = "rollcall",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// List stored rosters.
    Lists,
    /// Create a roster and open it.
    Create { name: String },
    /// Open a roster by id or name.
    Open { roster: String },
    /// Delete a roster by id or name.
    DeleteList { roster: String },
    /// Import a spreadsheet or CSV file into the open roster.
    Import { file: std::path::PathBuf },
    /// Add a person to the open roster.
    Add(PersonArgs),
    /// Flip a person between present and absent.
    Toggle { person: String },
    /// Remove a person from the open roster.
    Remove { person: String },
    /// Show the people on the open roster.
    Show(ViewArgs),
    /// Attendance counts for the open roster.
    Summary,
    /// Save the open roster now.
    Save,
    /// Write the open roster as CSV files.
    Export(ExportArgs),
    /// Show the open roster and whether it has unsaved changes.
    Status,
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

/// Asks on the shell's own input before unsaved changes are dropped.
struct Prompt<'a, I, O> {
    input: &'a mut I,
    output: &'a mut O,
}

impl<I: BufRead, O: Write> ConfirmDiscard for Prompt<'_, I, O> {
    fn confirm_discard(&mut self, roster: &Roster) -> bool {
        let asked = write!(
            self.output,
            "\"{}\" has unsaved changes. Discard them? [y/N] ",
            roster.name()
        )
        .and_then(|()| self.output.flush());
        if asked.is_err() {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Run the shell until `quit` or end of input, then save pending changes.
pub fn run<R, N, I, O>(session: &mut Session<R, N>, mut input: I, mut output: O) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
    I: BufRead,
    O: Write,
{
    writeln!(output, "rollcall shell. Type `help` for commands.")?;
    let mut line = String::new();
    loop {
        write!(output, "{}", prompt(session))?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let tokens = match tokenize(&line) {
            Ok(tokens) if tokens.is_empty() => continue,
            Ok(tokens) => tokens,
            Err(err) => {
                writeln!(output, "error: {err}")?;
                continue;
            }
        };
        let command = match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                write!(output, "{}", err.render())?;
                continue;
            }
        };
        if matches!(command, ShellCommand::Quit) {
            break;
        }

        let outcome = dispatch(session, command, &mut input, &mut output);
        if let Err(err) = outcome {
            // Session errors were already shown through the sink.
            if err.downcast_ref::<SessionError>().is_none() {
                writeln!(output, "error: {err:#}")?;
            }
        }
        if let Some(Err(err)) = session.tick(Utc::now()) {
            tracing::debug!(error = %err.log_message(), "auto-save after command failed");
        }
    }

    session.flush(Utc::now())?;
    Ok(())
}

fn prompt<R, N>(session: &Session<R, N>) -> String
where
    R: RosterRepository,
    N: NotificationSink,
{
    match session.active() {
        Some(roster) if session.is_dirty() => format!("rollcall [{}*]> ", roster.name()),
        Some(roster) => format!("rollcall [{}]> ", roster.name()),
        None => "rollcall> ".to_string(),
    }
}

fn dispatch<R, N, I, O>(
    session: &mut Session<R, N>,
    command: ShellCommand,
    input: &mut I,
    output: &mut O,
) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
    I: BufRead,
    O: Write,
{
    let now = Utc::now();
    match command {
        ShellCommand::Lists => print_rosters(session, output)?,
        ShellCommand::Create { name } => {
            let mut confirm = Prompt { input, output };
            session.create_roster(&name, &mut confirm, now)?;
        }
        ShellCommand::Open { roster } => {
            let id = resolve_roster(session, &roster)?;
            let mut confirm = Prompt { input, output };
            session.select_roster(&id, &mut confirm)?;
        }
        ShellCommand::DeleteList { roster } => {
            let id = resolve_roster(session, &roster)?;
            session.delete_roster(&id)?;
        }
        ShellCommand::Import { file } => import_path(session, &file)?,
        ShellCommand::Add(person) => {
            session.add_person(&person.to_entry(), now)?;
        }
        ShellCommand::Toggle { person } => {
            let id = parse_person_id(&person)?;
            if session.toggle_attendance(&id, now)?.is_none() {
                writeln!(output, "No person with id {id} on this roster.")?;
            }
        }
        ShellCommand::Remove { person } => {
            let id = parse_person_id(&person)?;
            if session.delete_person(&id, now)?.is_none() {
                writeln!(output, "No person with id {id} on this roster.")?;
            }
        }
        ShellCommand::Show(view) => {
            require_open(session)?;
            print_people(session, &view, output)?;
        }
        ShellCommand::Summary => {
            require_open(session)?;
            print_summary(session, output)?;
        }
        ShellCommand::Save => session.save(now)?,
        ShellCommand::Export(args) => {
            require_open(session)?;
            for path in export_to(session, &args)? {
                writeln!(output, "wrote {}", path.display())?;
            }
        }
        ShellCommand::Status => match session.active() {
            Some(roster) => {
                let state = match session.state() {
                    SaveState::Clean => "saved",
                    SaveState::Dirty => "unsaved changes",
                };
                writeln!(
                    output,
                    "{} ({}): {} people, {state}",
                    roster.name(),
                    roster.id(),
                    roster.len()
                )?;
            }
            None => writeln!(output, "No roster is open.")?,
        },
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn require_open<R, N>(session: &Session<R, N>) -> Result<()>
where
    R: RosterRepository,
    N: NotificationSink,
{
    if session.active().is_none() {
        bail!("no roster is open; use `open <roster>` or `create <name>`");
    }
    Ok(())
}

/// Split a line into words, honoring single quotes, double quotes and
/// backslash escapes outside single quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_token = true;
                }
                None => bail!("line ends with a lone backslash"),
            },
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quote.is_some() {
        bail!("unterminated quote");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
