//! File I/O for `.roll` roster files.
//!
//! Saving uses atomic writes; loading validates magic bytes and the
//! schema version before touching the payload.

mod load;
mod save;

pub use load::{decode_roster, load_roster_file, load_roster_file_async};
pub use save::{encode_roster, save_roster_file, save_roster_file_async};
