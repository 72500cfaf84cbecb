//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rollcall_core::{ManualEntry, RosterView, SortField, SortOrder};

#[derive(Parser)]
#[command(
    name = "rollcall",
    version,
    about = "Attendance rosters from spreadsheets and manual entry",
    long_about = "Keep attendance rosters built from imported spreadsheets (.xlsx, .xls, .csv)\n\
                  and hand-entered people. Every change is saved to the data directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow person names in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: the platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the roster files (overrides the settings file).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List stored rosters.
    Lists,

    /// Create an empty roster.
    Create {
        /// Display name of the roster.
        name: String,
    },

    /// Delete a roster and its file.
    DeleteList {
        /// Roster id or name.
        roster: String,
    },

    /// Import people from a spreadsheet or CSV file.
    Import {
        /// Roster id or name.
        roster: String,
        /// File to read (.xlsx, .xls or .csv, at most 10 MiB).
        file: PathBuf,
    },

    /// Add a person by hand. They start as present.
    Add {
        /// Roster id or name.
        roster: String,
        #[command(flatten)]
        person: PersonArgs,
    },

    /// Flip a person between present and absent.
    Toggle {
        /// Roster id or name.
        roster: String,
        /// Person id as shown by `show`.
        person: String,
    },

    /// Remove a person from a roster.
    Remove {
        /// Roster id or name.
        roster: String,
        /// Person id as shown by `show`.
        person: String,
    },

    /// Show the people on a roster.
    Show {
        /// Roster id or name.
        roster: String,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show attendance counts for a roster.
    Summary {
        /// Roster id or name.
        roster: String,
    },

    /// Write the people and summary sheets as CSV files.
    Export {
        /// Roster id or name.
        roster: String,
        #[command(flatten)]
        out: ExportArgs,
    },

    /// Interactive session.
    Shell,
}

#[derive(Args, Debug, Clone)]
pub struct PersonArgs {
    /// Given name(s).
    #[arg(long)]
    pub given: String,

    /// Family name(s).
    #[arg(long)]
    pub family: String,

    #[arg(long = "national-id", value_name = "ID")]
    pub national_id: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

impl PersonArgs {
    pub fn to_entry(&self) -> ManualEntry {
        ManualEntry {
            given_name: self.given.clone(),
            family_name: self.family.clone(),
            national_id: self.national_id.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Only people whose name, national id or phone contains this text.
    #[arg(long)]
    pub search: Option<String>,

    /// Sort field.
    #[arg(long, value_enum, default_value = "family")]
    pub sort: SortArg,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,
}

impl ViewArgs {
    pub fn to_view(&self) -> RosterView {
        let order = if self.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        let field = match self.sort {
            SortArg::Family => SortField::Family,
            SortArg::Given => SortField::Given,
        };
        let view = RosterView::default().sorted_by(field, order);
        match &self.search {
            Some(term) => view.search(term.clone()),
            None => view,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Directory for the CSV files (default: current directory).
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SortArg {
    #[default]
    Family,
    Given,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_contact() {
        let cli = Cli::try_parse_from([
            "rollcall",
            "--data-dir",
            "/tmp/rosters",
            "add",
            "Grupo A",
            "--given",
            "Ana",
            "--family",
            "García Pérez",
            "--phone",
            "600123123",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/rosters")));
        let Command::Add { roster, person } = cli.command else {
            panic!("expected add");
        };
        assert_eq!(roster, "Grupo A");
        let entry = person.to_entry();
        assert_eq!(entry.family_name, "García Pérez");
        assert_eq!(entry.phone.as_deref(), Some("600123123"));
        assert_eq!(entry.national_id, None);
    }

    #[test]
    fn test_view_args() {
        let args = ViewArgs {
            search: Some("ana".to_string()),
            sort: SortArg::Given,
            desc: true,
        };
        let view = args.to_view();
        assert_eq!(view.sort_by, SortField::Given);
        assert_eq!(view.order, SortOrder::Desc);
        assert_eq!(view.search.as_deref(), Some("ana"));
    }
}
