//! The data handed to an export sink.
//!
//! An export is two sheets: one row per person, and a key/value summary.
//! Rendering them (CSV here, workbooks or documents elsewhere) is the
//! sink's business; this module fixes the content and the file stem.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use rollcall_model::Roster;

use crate::summary::AttendanceSummary;

pub const PEOPLE_SHEET: &str = "People";
pub const SUMMARY_SHEET: &str = "Summary";

const PEOPLE_HEADER: [&str; 8] = [
    "No.",
    "Given name",
    "Family name",
    "National ID",
    "Phone",
    "Attendance",
    "Origin",
    "Created",
];

/// A named table of text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: &'static str,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Write header and rows as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(&self.header)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> csv::Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    /// `<roster name>_<YYYY-MM-DD>`, safe to use as a file name.
    pub file_stem: String,
    pub people: Sheet,
    pub summary: Sheet,
}

impl ExportBundle {
    pub fn build(roster: &Roster, summary: &AttendanceSummary, exported_at: DateTime<Utc>) -> Self {
        let people = roster
            .people()
            .iter()
            .enumerate()
            .map(|(index, person)| {
                vec![
                    (index + 1).to_string(),
                    person.given_name().to_string(),
                    person.family_name().to_string(),
                    person.national_id().unwrap_or_default().to_string(),
                    person.phone().unwrap_or_default().to_string(),
                    if person.present() { "Present" } else { "Absent" }.to_string(),
                    person.origin().label().to_string(),
                    person.created_at().format("%Y-%m-%d").to_string(),
                ]
            })
            .collect();

        let summary_rows = [
            ("Roster", roster.name().to_string()),
            ("Total", summary.total.to_string()),
            ("Present", summary.present.to_string()),
            ("Absent", summary.absent.to_string()),
            ("Present (imported)", summary.present_from_import.to_string()),
            ("Present (manual)", summary.present_manual.to_string()),
            ("Absent (imported)", summary.absent_from_import.to_string()),
            ("Absent (manual)", summary.absent_manual.to_string()),
            (
                "Exported at",
                exported_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ]
        .into_iter()
        .map(|(key, value)| vec![key.to_string(), value])
        .collect();

        Self {
            file_stem: file_stem(roster.name(), exported_at),
            people: Sheet {
                name: PEOPLE_SHEET,
                header: PEOPLE_HEADER.iter().map(|h| (*h).to_string()).collect(),
                rows: people,
            },
            summary: Sheet {
                name: SUMMARY_SHEET,
                header: vec!["Field".to_string(), "Value".to_string()],
                rows: summary_rows,
            },
        }
    }
}

fn file_stem(name: &str, exported_at: DateTime<Utc>) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_{}", safe, exported_at.format("%Y-%m-%d"))
}
