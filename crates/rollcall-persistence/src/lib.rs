//! Persistent storage and auto-save for attendance rosters.
//!
//! # Features
//!
//! - **rkyv serialization** of roster snapshots
//! - **Atomic writes** to prevent data corruption
//! - **Pluggable storage** behind [`RosterRepository`]
//! - **Auto-save** with a Clean/Dirty state machine and debounce support
//!
//! # File Format
//!
//! Each roster lives in its own `<roster-id>.roll` file:
//!
//! ```text
//! +------------------+
//! | Magic: "RCL\x01" | 4 bytes - file identification
//! +------------------+
//! | Version: 1       | 4 bytes - u32 little-endian schema version
//! +------------------+
//! | rkyv Payload     | Variable - RosterFile
//! +------------------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rollcall_persistence::{AutoSaveConfig, AutosaveController, FileStore, RosterRepository};
//!
//! let mut store = FileStore::open("/var/lib/rollcall")?;
//! let mut controller = AutosaveController::new(AutoSaveConfig::default());
//! controller.load(roster);
//! controller.record_mutation(changed);
//! controller.autosave(&mut store, Utc::now());
//! ```
//!
//! # Architecture
//!
//! - `types/` - Persistence types (rkyv-serializable snapshots)
//! - `io/` - File I/O operations (save, load)
//! - `store/` - The persistence collaborator and its file/memory stores
//! - `autosave/` - Dirty tracking, config and the controller
//! - `convert.rs` - Conversion traits and timestamp helpers
//! - `error.rs` - Error types with user-friendly messages

mod autosave;
mod convert;
mod error;
mod io;
mod store;
mod types;

pub use autosave::{AutoSaveConfig, AutosaveController, DirtyTracker, SaveState};
pub use convert::{FromSnapshot, ToSnapshot, format_timestamp, parse_timestamp};
pub use error::{PersistenceError, Result};
pub use io::{
    decode_roster, encode_roster, load_roster_file, load_roster_file_async, save_roster_file,
    save_roster_file_async,
};
pub use store::{FileStore, MemoryStore, RosterRepository};
pub use types::{
    CURRENT_SCHEMA_VERSION, MAGIC_BYTES, OriginSnapshot, PersonSnapshot, ROSTER_FILE_EXTENSION,
    RosterFile, RosterSnapshot,
};
