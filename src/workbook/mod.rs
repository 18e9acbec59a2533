//! Excel workbook reading.
//!
//! The award-detail export arrives as an `.xlsx` workbook with the amendment
//! rows on a named sheet. Cells are flattened to the same JSON-object row
//! shape the delimited-table parser produces, so the grouper can consume rows
//! from either source. Date cells are rendered as `YYYY-MM-DD` strings.

use calamine::{open_workbook_auto, Data, Reader};
use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{WorkbookError, WorkbookResult};

/// Default sheet holding amendment rows.
pub const DEFAULT_SHEET: &str = "Award Details";

/// Rows read from one worksheet.
#[derive(Debug, Clone)]
pub struct SheetData {
    /// Rows as JSON objects keyed by header.
    pub records: Vec<Value>,
    /// Column headers from the first row.
    pub headers: Vec<String>,
    /// Sheet the rows came from.
    pub sheet: String,
}

/// Read a worksheet into JSON-object rows.
///
/// The first row supplies headers; fully-empty rows are skipped. Rows wider
/// than the header row are truncated, narrower rows are padded with "".
pub fn read_sheet<P: AsRef<Path>>(path: P, sheet: &str) -> WorkbookResult<SheetData> {
    let mut workbook =
        open_workbook_auto(path.as_ref()).map_err(|e| WorkbookError::Open(e.to_string()))?;

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|_| WorkbookError::SheetNotFound(sheet.to_string()))?;

    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| WorkbookError::EmptySheet(sheet.to_string()))?
        .iter()
        .map(|c| cell_to_string(c).trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(WorkbookError::EmptySheet(sheet.to_string()));
    }

    let mut records = Vec::new();

    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(i).map(cell_to_string).unwrap_or_default();
            obj.insert(header.clone(), json!(value.trim()));
        }
        records.push(Value::Object(obj));
    }

    Ok(SheetData {
        records,
        headers,
        sheet: sheet.to_string(),
    })
}

/// Render a cell as text, with date cells as `YYYY-MM-DD`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.chars().take(10).collect(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
