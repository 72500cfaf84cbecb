//! Persistence types for roster serialization.
//!
//! These types are designed for zero-copy deserialization with rkyv.
//! They mirror the model types but keep timestamps as RFC 3339 text.

mod person;
mod roster;

pub use person::{OriginSnapshot, PersonSnapshot};
pub use roster::{RosterFile, RosterSnapshot};

/// Current schema version.
///
/// Increment this when making breaking changes to the persistence format.
/// The loader will reject files with version > CURRENT_SCHEMA_VERSION.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Magic bytes at the start of .roll files.
///
/// Format: "RCL" + version byte (0x01 for v1)
pub const MAGIC_BYTES: [u8; 4] = [b'R', b'C', b'L', 0x01];

/// File extension of stored rosters.
pub const ROSTER_FILE_EXTENSION: &str = "roll";
