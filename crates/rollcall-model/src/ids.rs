use std::fmt;

use serde::Serialize;

use crate::error::{Result, RosterError};

/// Prefix of ids minted for hand-entered people.
pub const MANUAL_ID_PREFIX: &str = "manual_";

/// Prefix of ids minted for imported people.
pub const IMPORTED_ID_PREFIX: &str = "excel_";

/// Identifier of a person within a roster.
///
/// The textual form records the origin batch: `manual_<millis>` for manual
/// entries and `excel_<millis>_<index>` for imported rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(RosterError::EmptyId);
        }
        Ok(Self(value))
    }

    pub fn manual(stamp: i64) -> Self {
        Self(format!("{MANUAL_ID_PREFIX}{stamp}"))
    }

    pub fn imported(stamp: i64, index: usize) -> Self {
        Self(format!("{IMPORTED_ID_PREFIX}{stamp}_{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this id was minted with `prefix` and millisecond `stamp`.
    pub fn uses_stamp(&self, prefix: &str, stamp: i64) -> bool {
        let Some(rest) = self.0.strip_prefix(prefix) else {
            return false;
        };
        let stamp = stamp.to_string();
        match rest.strip_prefix(stamp.as_str()) {
            Some(tail) => tail.is_empty() || tail.starts_with('_'),
            None => false,
        }
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RosterId(String);

impl RosterId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(RosterError::EmptyId);
        }
        Ok(Self(value))
    }

    /// Mint a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RosterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
