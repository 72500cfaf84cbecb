//! Person snapshot.

use rkyv::{Archive, Deserialize, Serialize};

/// Stored form of a person record.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct PersonSnapshot {
    pub id: String,
    pub given_name: String,
    pub family_name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub present: bool,
    pub origin: OriginSnapshot,
    /// RFC 3339 with full sub-second precision.
    pub created_at: String,
}

/// Stored form of a person's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub enum OriginSnapshot {
    Imported,
    Manual,
}
