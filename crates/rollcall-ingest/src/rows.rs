//! Raw tabular rows and the readers that produce them.

use std::path::{Path, PathBuf};

use crate::csv::read_csv_rows;
use crate::error::{IngestError, Result};
use crate::validate::{FileDescriptor, TabularFormat, validate_import_file};
use crate::workbook::read_workbook_rows;

/// One row of cells as text, in source column order.
pub type RawRow = Vec<String>;

/// Fully read content of an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularData {
    /// Name of the file the rows came from.
    pub source_name: String,
    pub format: TabularFormat,
    /// All rows, header included.
    pub rows: Vec<RawRow>,
}

/// Parse in-memory content of a known format.
pub fn read_rows(bytes: &[u8], format: TabularFormat) -> Result<Vec<RawRow>> {
    match format {
        TabularFormat::Csv => read_csv_rows(bytes),
        TabularFormat::Xlsx | TabularFormat::Xls => read_workbook_rows(bytes, format),
    }
}

/// Validate and read an import file from disk.
///
/// Validation happens before any content is read.
pub fn read_import_file(path: &Path) -> Result<TabularData> {
    let descriptor = FileDescriptor::from_path(path)?;
    let format = validate_import_file(&descriptor)?;

    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rows = read_rows(&bytes, format)?;

    tracing::info!(
        path = %path.display(),
        %format,
        rows = rows.len(),
        "read import file"
    );
    Ok(TabularData {
        source_name: descriptor.name,
        format,
        rows,
    })
}

/// Read an import file on the blocking thread pool.
///
/// Dropping the returned future abandons the read; nothing needs cleaning up.
pub async fn read_import_file_async(path: PathBuf) -> Result<TabularData> {
    tokio::task::spawn_blocking(move || read_import_file(&path))
        .await
        .map_err(|e| IngestError::Task {
            message: e.to_string(),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_import_file_csv() {
        let file = temp_file(".csv", b"N1,N2,A1,A2\nAna,,Garcia,\n");
        let data = read_import_file(file.path()).unwrap();
        assert_eq!(data.format, TabularFormat::Csv);
        assert_eq!(data.rows.len(), 2);
        assert!(data.source_name.ends_with(".csv"));
    }

    #[test]
    fn test_read_import_file_rejects_before_reading() {
        let file = temp_file(".txt", b"N1,N2,A1,A2\n");
        assert!(matches!(
            read_import_file(file.path()),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_import_file_async() {
        let file = temp_file(".csv", b"N1,N2,A1,A2\nAna,,Garcia,\nLuis,,Soto,\n");
        let data = read_import_file_async(file.path().to_path_buf())
            .await
            .unwrap();
        assert_eq!(data.rows.len(), 3);
    }
}
