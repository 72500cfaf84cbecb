//! Workbook (XLSX/XLS) content to raw rows.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::error::{IngestError, Result};
use crate::rows::RawRow;
use crate::validate::TabularFormat;

/// Read the first worksheet of a workbook, header row included.
///
/// Cells are indexed from the first column of the used range, so a sheet
/// whose data starts in column B reads B as cell 0.
pub fn read_workbook_rows(bytes: &[u8], format: TabularFormat) -> Result<Vec<RawRow>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| IngestError::parse(format, e))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => return Err(IngestError::parse(format, e)),
        None => {
            tracing::debug!("workbook has no worksheets");
            return Ok(Vec::new());
        }
    };

    let rows: Vec<RawRow> = range
        .rows()
        .map(|cells| cells.iter().map(cell_text).collect())
        .collect();

    tracing::debug!(rows = rows.len(), %format, "read workbook content");
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}
