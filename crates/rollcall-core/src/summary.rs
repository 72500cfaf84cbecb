//! Attendance summary.

use rollcall_model::Roster;
use serde::Serialize;

/// Attendance counts derived from a roster. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub present_from_import: usize,
    pub present_manual: usize,
    pub absent_from_import: usize,
    pub absent_manual: usize,
}

impl AttendanceSummary {
    /// Share of people present, in percent. Zero for an empty roster.
    pub fn attendance_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.present as f64 * 100.0 / self.total as f64
        }
    }

    pub fn imported(&self) -> usize {
        self.present_from_import + self.absent_from_import
    }

    pub fn manual(&self) -> usize {
        self.present_manual + self.absent_manual
    }
}

/// Count people by attendance and origin.
pub fn summarize(roster: &Roster) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        total: roster.len(),
        ..AttendanceSummary::default()
    };
    for person in roster.people() {
        match (person.present(), person.is_manual()) {
            (true, true) => summary.present_manual += 1,
            (true, false) => summary.present_from_import += 1,
            (false, true) => summary.absent_manual += 1,
            (false, false) => summary.absent_from_import += 1,
        }
    }
    summary.present = summary.present_manual + summary.present_from_import;
    summary.absent = summary.absent_manual + summary.absent_from_import;
    summary
}
