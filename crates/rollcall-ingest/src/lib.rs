//! Roster import pipeline.
//!
//! This crate turns a tabular file (CSV, XLSX or XLS) into people ready to
//! append to a roster.
//!
//! # Pipeline
//!
//! 1. **Validation**: [`validate_import_file`] checks the declared media type
//!    or file extension and the 10 MiB size ceiling before anything is read.
//! 2. **Reading**: [`read_rows`] parses the whole content into raw text rows.
//!    A malformed file fails the whole import with [`IngestError::Parse`].
//! 3. **Normalization**: [`normalize_rows`] drops the header, skips
//!    incomplete rows, composes names, removes batch-local duplicates, sorts
//!    by family name and mints ids.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rollcall_ingest::{ImportOptions, normalize_rows, read_import_file};
//!
//! let data = read_import_file(Path::new("class.xlsx"))?;
//! let batch = normalize_rows(&data.rows, &roster, ImportOptions::default(), Utc::now())?;
//! println!("{} people, {} duplicates", batch.people.len(), batch.duplicates_found);
//! ```

mod csv;
mod error;
mod normalize;
mod rows;
mod validate;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Validation ===
pub use validate::{
    FileDescriptor, MAX_IMPORT_FILE_SIZE, TabularFormat, validate_import_file,
    validate_import_file_with_limit,
};

// === Reading ===
pub use self::csv::{read_csv_rows, validate_encoding};
pub use rows::{RawRow, TabularData, read_import_file, read_import_file_async, read_rows};
pub use workbook::read_workbook_rows;

// === Normalization ===
pub use normalize::{ImportBatch, ImportOptions, normalize_rows};
