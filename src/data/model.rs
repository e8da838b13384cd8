use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Well-known columns of a bank-marketing dataset
// ---------------------------------------------------------------------------

/// Numeric column driving the range filter.
pub const AGE_COLUMN: &str = "age";

/// Binary outcome column ("yes" / "no").
pub const OUTCOME_COLUMN: &str = "y";

/// Categorical columns offered as multiselect filters, in form order.
/// One ordered list drives the whole filter form; columns are never
/// hand-duplicated elsewhere.
pub const CATEGORICAL_COLUMNS: &[&str] = &[
    "job",
    "marital",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
];

/// Every column an uploaded dataset must carry.
pub const EXPECTED_COLUMNS: &[&str] = &[
    AGE_COLUMN,
    "job",
    "marital",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
    OUTCOME_COLUMN,
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the value kinds found in marketing
/// exports: categorical text, integer ages, spreadsheet floats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for the numeric range filter.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – ordered named columns over row-major storage
// ---------------------------------------------------------------------------

/// An in-memory table. Columns are ordered and named; rows share a
/// positional index that is re-assigned contiguously whenever a subset is
/// derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from a header and row-major cells. Every row must be
    /// exactly as wide as the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Table { columns, rows }
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, in positional order.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decompose into `(columns, rows)`. The filter engine uses this to
    /// derive subsets without copying rows that survive.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<CellValue>>) {
        (self.columns, self.rows)
    }

    /// Position of `name` among the columns, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of `name`, or [`DataError::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.column_index(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Check that every listed column is present. The first missing one is
    /// reported.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), DataError> {
        for name in names {
            self.require_column(name)?;
        }
        Ok(())
    }

    /// Sorted distinct values of a column, in display form. Drives the
    /// multiselect option lists.
    pub fn unique_strings(&self, column: &str) -> Result<BTreeSet<String>, DataError> {
        let idx = self.require_column(column)?;
        Ok(self.rows.iter().map(|row| row[idx].to_string()).collect())
    }

    /// Min/max over the numeric cells of a column. `None` when the column
    /// holds no numeric values (including the zero-row case).
    pub fn numeric_bounds(&self, column: &str) -> Result<Option<(f64, f64)>, DataError> {
        let idx = self.require_column(column)?;
        let mut bounds: Option<(f64, f64)> = None;
        for row in &self.rows {
            if let Some(v) = row[idx].as_f64() {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        Table::new(
            vec!["age".into(), "job".into()],
            vec![
                vec![CellValue::Integer(31), CellValue::String("admin.".into())],
                vec![CellValue::Integer(52), CellValue::String("retired".into())],
                vec![CellValue::Integer(44), CellValue::String("admin.".into())],
            ],
        )
    }

    #[test]
    fn unique_strings_are_sorted_and_deduplicated() {
        let t = people();
        let jobs: Vec<String> = t.unique_strings("job").unwrap().into_iter().collect();
        assert_eq!(jobs, vec!["admin.".to_string(), "retired".to_string()]);
    }

    #[test]
    fn require_column_reports_missing_name() {
        let t = people();
        let err = t.require_column("education").unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound(name) if name == "education"));
    }

    #[test]
    fn numeric_bounds_span_the_column() {
        let t = people();
        assert_eq!(t.numeric_bounds("age").unwrap(), Some((31.0, 52.0)));

        let empty = Table::new(vec!["age".into()], Vec::new());
        assert_eq!(empty.numeric_bounds("age").unwrap(), None);
    }
}
