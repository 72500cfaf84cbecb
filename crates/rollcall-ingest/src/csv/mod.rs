//! CSV reading utilities.

mod reader;

pub use reader::{read_csv_rows, strip_utf8_bom, validate_encoding};
