//! Roster logic for rollcall.
//!
//! - [`ops`] - pure roster mutations (create, append, add, toggle, delete)
//! - [`summary`] - attendance counts derived from a roster
//! - [`view`] - search and ordering for display
//! - [`export`] - the sheets handed to an export sink
//! - [`notify`] - user-facing notifications
//! - [`session`] - the orchestrator that owns the active roster

pub mod error;
pub mod export;
pub mod notify;
pub mod ops;
pub mod session;
pub mod summary;
pub mod view;

pub use error::{Result, SessionError};
pub use export::{ExportBundle, PEOPLE_SHEET, SUMMARY_SHEET, Sheet};
pub use notify::{Notification, NotificationLog, NotificationSink, Severity};
pub use ops::{
    ManualEntry, add_manual, append_imported, create_roster, delete_student, toggle_attendance,
};
pub use session::{ConfirmDiscard, ImportReport, ImportTicket, Session, SessionConfig};
pub use summary::{AttendanceSummary, summarize};
pub use view::{RosterView, SortField, SortOrder};
