use rust_xlsxwriter::Workbook;

use super::error::DataError;
use super::model::{CellValue, Table};

/// Serialize a table to an in-memory `.xlsx` workbook: one sheet, the
/// column names as the header row, then every row in positional order.
/// No index column is written.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>, DataError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string(0, col as u16, name.as_str())?;
    }

    for (row_no, row) in table.rows().iter().enumerate() {
        let r = row_no as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                CellValue::String(s) => {
                    sheet.write_string(r, c, s.as_str())?;
                }
                CellValue::Integer(i) => {
                    sheet.write_number(r, c, *i as f64)?;
                }
                CellValue::Float(v) => {
                    sheet.write_number(r, c, *v)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                CellValue::Null => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use crate::data::summary::summarize;

    fn subset() -> Table {
        Table::new(
            vec!["age".into(), "job".into(), "y".into()],
            vec![
                vec![
                    CellValue::Integer(40),
                    CellValue::String("technician".into()),
                    CellValue::String("no".into()),
                ],
                vec![
                    CellValue::Integer(60),
                    CellValue::String("retired".into()),
                    CellValue::String("yes".into()),
                ],
            ],
        )
    }

    #[test]
    fn export_then_reload_preserves_shape() {
        let table = subset();
        let bytes = to_xlsx(&table).unwrap();
        let reloaded = load_bytes(&bytes).unwrap();

        assert_eq!(reloaded.columns(), table.columns());
        assert_eq!(reloaded.len(), table.len());
        // Spreadsheet numbers come back as whole floats and are narrowed
        // again, so the age survives as-is.
        assert_eq!(reloaded.rows()[0][0], CellValue::Integer(40));
        assert_eq!(reloaded.rows()[1][2], CellValue::String("yes".into()));
    }

    #[test]
    fn summary_table_exports_with_canonical_columns() {
        let summary = summarize(&subset(), "y").unwrap();
        let bytes = to_xlsx(&summary.to_table()).unwrap();
        let reloaded = load_bytes(&bytes).unwrap();

        assert_eq!(reloaded.columns(), &["outcome", "percent"]);
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn empty_table_still_produces_a_header_row() {
        let empty = Table::new(vec!["outcome".into(), "percent".into()], Vec::new());
        let bytes = to_xlsx(&empty).unwrap();
        let reloaded = load_bytes(&bytes).unwrap();

        assert_eq!(reloaded.columns(), &["outcome", "percent"]);
        assert!(reloaded.is_empty());
    }
}
