use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader};

use super::error::DataError;
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse uploaded bytes into a [`Table`].
///
/// Semicolon-delimited CSV is attempted first; on failure the bytes are
/// handed to the spreadsheet reader. Only when both refuse the input does
/// loading fail, with [`DataError::UnparseableInput`]. Pure and idempotent
/// for identical bytes.
pub fn load_bytes(bytes: &[u8]) -> Result<Table, DataError> {
    let csv_err = match parse_csv(bytes) {
        Ok(table) => return Ok(table),
        Err(e) => e,
    };
    match parse_workbook(bytes) {
        Ok(table) => Ok(table),
        Err(workbook_err) => Err(DataError::UnparseableInput(format!(
            "csv: {csv_err}; spreadsheet: {workbook_err}"
        ))),
    }
}

/// Read a dataset file from disk.
pub fn load_file(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let table = load_bytes(&bytes)?;
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// ZIP local-file and OLE compound-document signatures. NUL bytes are valid
/// UTF-8, so without this check a workbook can "parse" as one garbage CSV
/// column instead of reaching the spreadsheet reader.
fn looks_like_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK") || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0])
}

fn parse_csv(bytes: &[u8]) -> std::result::Result<Table, String> {
    if looks_like_workbook(bytes) {
        return Err("binary workbook signature".to_string());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.len() < 2 {
        return Err("header row is not semicolon-delimited".to_string());
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("row {row_no}: {e}"))?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(Table::new(columns, rows))
}

/// Guess a cell type from its text form.
fn parse_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Spreadsheet
// ---------------------------------------------------------------------------

/// First worksheet only; the first row is the header.
fn parse_workbook(bytes: &[u8]) -> std::result::Result<Table, String> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor).map_err(|e| e.to_string())?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no sheets".to_string())?
        .map_err(|e| e.to_string())?;

    let mut sheet_rows = range.rows();
    let header = sheet_rows
        .next()
        .ok_or_else(|| "worksheet is empty".to_string())?;
    let columns: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    if columns.is_empty() {
        return Err("worksheet header row is empty".to_string());
    }

    let rows: Vec<Vec<CellValue>> = sheet_rows
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(workbook_cell).collect();
            cells.resize(columns.len(), CellValue::Null);
            cells
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn workbook_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        // Text cells go through the same type guessing as CSV fields so the
        // two formats produce identical tables.
        Data::String(s) => parse_cell(s),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => {
            // Spreadsheets store every number as a float; narrow the whole
            // ones back to integers (ages, counts).
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                CellValue::Integer(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_semicolon_csv_with_guessed_types() {
        let text = b"age;job;y\n42;admin.;yes\n31;;no\n";
        let table = load_bytes(text).unwrap();

        assert_eq!(table.columns(), &["age", "job", "y"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], CellValue::Integer(42));
        assert_eq!(table.rows()[0][2], CellValue::String("yes".into()));
        assert_eq!(table.rows()[1][1], CellValue::Null);
    }

    #[test]
    fn identical_bytes_load_identically() {
        let text = b"age;y\n25;yes\n60;no\n";
        assert_eq!(load_bytes(text).unwrap(), load_bytes(text).unwrap());
    }

    #[test]
    fn rejects_bytes_that_are_neither_format() {
        let garbage = [0x00, 0x7f, 0x13, 0x37, 0xff, 0xfe];
        let err = load_bytes(&garbage).unwrap_err();
        assert!(matches!(err, DataError::UnparseableInput(_)));
    }

    #[test]
    fn rejects_csv_without_semicolons() {
        // A comma-delimited file yields a single header field, which is not
        // an acceptable table shape for this tool.
        let text = b"age,job,y\n42,admin.,yes\n";
        let err = load_bytes(text).unwrap_err();
        assert!(matches!(err, DataError::UnparseableInput(_)));
    }
}
