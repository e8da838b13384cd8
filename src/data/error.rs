use thiserror::Error;

/// Failures of the load → filter → summarize → export pipeline.
///
/// A zero-row result is never an error: filtering everything away is a
/// valid, displayable outcome.
#[derive(Debug, Error)]
pub enum DataError {
    /// An operation referenced a column the dataset does not carry.
    #[error("column '{0}' not found in the dataset")]
    ColumnNotFound(String),

    /// The uploaded bytes parse neither as semicolon-delimited CSV nor as a
    /// spreadsheet workbook.
    #[error("could not read the file as semicolon-delimited CSV or as a spreadsheet: {0}")]
    UnparseableInput(String),

    /// The spreadsheet writer failed while serializing a table.
    #[error("spreadsheet export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}
