//! Root roster file type.

use chrono::{DateTime, Utc};
use rkyv::{Archive, Deserialize, Serialize};

use super::PersonSnapshot;
use crate::convert::format_timestamp;

/// Root structure of a .roll file.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct RosterFile {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When this file was written.
    pub written_at: String,

    pub roster: RosterSnapshot,
}

impl RosterFile {
    pub fn new(roster: RosterSnapshot) -> Self {
        Self {
            schema_version: super::CURRENT_SCHEMA_VERSION,
            written_at: format_timestamp(Utc::now()),
            roster,
        }
    }

    /// Parse the written_at timestamp.
    pub fn written_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.written_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Stored form of a roster.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub id: String,
    pub name: String,
    pub people: Vec<PersonSnapshot>,
    pub created_at: String,
    pub modified_at: String,
}
