//! CSV content to raw rows.

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};
use crate::rows::RawRow;
use crate::validate::TabularFormat;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reject encodings we cannot read (UTF-16 with a byte order mark).
pub fn validate_encoding(bytes: &[u8]) -> Result<()> {
    if bytes.len() >= 2 {
        // UTF-16 LE BOM
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
            });
        }
        // UTF-16 BE BOM
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

pub fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Read every record of a CSV document, header included.
///
/// Rows keep their own width; nothing is padded or trimmed here.
pub fn read_csv_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    validate_encoding(bytes)?;
    let content = strip_utf8_bom(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::parse(TabularFormat::Csv, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(rows = rows.len(), "read CSV content");
    Ok(rows)
}
