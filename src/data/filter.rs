use std::collections::BTreeSet;

use super::error::DataError;
use super::model::{Table, AGE_COLUMN};

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Wildcard token meaning "no restriction on this column". It is offered as
/// an entry in every multiselect and is selected by default.
pub const SELECT_ALL: &str = "all";

/// Keep the rows whose value in `column` is one of `selected`.
///
/// If the wildcard token is selected the table flows through untouched
/// (structural passthrough, no copy). An empty selection keeps nothing,
/// which is a valid zero-row result. The surviving rows are re-indexed
/// contiguously from zero by construction.
pub fn apply_filter(
    table: Table,
    column: &str,
    selected: &BTreeSet<String>,
) -> Result<Table, DataError> {
    if selected.contains(SELECT_ALL) {
        return Ok(table);
    }
    let idx = table.require_column(column)?;
    let (columns, rows) = table.into_parts();
    let kept: Vec<_> = rows
        .into_iter()
        .filter(|row| selected.contains(&row[idx].to_string()))
        .collect();
    Ok(Table::new(columns, kept))
}

/// Keep the rows whose numeric value in `column` lies in `[min, max]`,
/// inclusive at both ends. Cells without a numeric reading are excluded.
pub fn apply_range(table: Table, column: &str, min: f64, max: f64) -> Result<Table, DataError> {
    let idx = table.require_column(column)?;
    let (columns, rows) = table.into_parts();
    let kept: Vec<_> = rows
        .into_iter()
        .filter(|row| {
            row[idx]
                .as_f64()
                .map(|v| v >= min && v <= max)
                .unwrap_or(false)
        })
        .collect();
    Ok(Table::new(columns, kept))
}

// ---------------------------------------------------------------------------
// FilterSpec – one submitted filter pass
// ---------------------------------------------------------------------------

/// The complete parameter set of one filter pass: the inclusive age range
/// plus an ordered list of per-column selections.
///
/// The list order is fixed by the form configuration so composition is
/// deterministic; the final row set does not depend on it, since every
/// predicate is conjunctive. `PartialEq` lets the application skip a pass
/// whose parameters are identical to the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub age_min: f64,
    pub age_max: f64,
    pub selections: Vec<(String, BTreeSet<String>)>,
}

impl FilterSpec {
    /// Run the whole chain: the age range first, then each categorical
    /// filter in list order. An empty intermediate table propagates through
    /// the remaining stages without error.
    pub fn apply(&self, table: &Table) -> Result<Table, DataError> {
        let mut current = apply_range(table.clone(), AGE_COLUMN, self.age_min, self.age_max)?;
        for (column, selected) in &self.selections {
            current = apply_filter(current, column, selected)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn wildcard() -> BTreeSet<String> {
        BTreeSet::from([SELECT_ALL.to_string()])
    }

    fn values(vals: &[&str]) -> BTreeSet<String> {
        vals.iter().map(|v| v.to_string()).collect()
    }

    fn campaign_table() -> Table {
        let row = |age: i64, job: &str, housing: &str, y: &str| {
            vec![
                CellValue::Integer(age),
                CellValue::String(job.into()),
                CellValue::String(housing.into()),
                CellValue::String(y.into()),
            ]
        };
        Table::new(
            vec!["age".into(), "job".into(), "housing".into(), "y".into()],
            vec![
                row(25, "admin.", "yes", "yes"),
                row(40, "technician", "no", "no"),
                row(60, "retired", "yes", "yes"),
            ],
        )
    }

    #[test]
    fn wildcard_is_an_identity() {
        let table = campaign_table();
        let out = apply_filter(table.clone(), "job", &wildcard()).unwrap();
        assert_eq!(out, table);
    }

    #[test]
    fn empty_selection_keeps_nothing() {
        let out = apply_filter(campaign_table(), "job", &BTreeSet::new()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns().len(), 4);
    }

    #[test]
    fn selection_keeps_matching_rows_only() {
        let out = apply_filter(campaign_table(), "job", &values(&["admin.", "retired"])).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0][0], CellValue::Integer(25));
        assert_eq!(out.rows()[1][0], CellValue::Integer(60));
    }

    #[test]
    fn value_absent_from_table_yields_zero_rows() {
        let out = apply_filter(campaign_table(), "job", &values(&["student"])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = apply_filter(campaign_table(), "education", &values(&["basic"])).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound(_)));
    }

    #[test]
    fn age_range_is_inclusive_at_both_ends() {
        let out = apply_range(campaign_table(), "age", 30.0, 60.0).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows()[0][0], CellValue::Integer(40));
        assert_eq!(out.rows()[1][0], CellValue::Integer(60));
    }

    #[test]
    fn categorical_order_does_not_change_the_result() {
        let forward = FilterSpec {
            age_min: 0.0,
            age_max: 100.0,
            selections: vec![
                ("job".into(), values(&["admin.", "retired"])),
                ("housing".into(), values(&["yes"])),
            ],
        };
        let reversed = FilterSpec {
            age_min: 0.0,
            age_max: 100.0,
            selections: forward.selections.iter().rev().cloned().collect(),
        };

        let table = campaign_table();
        let a = forward.apply(&table).unwrap();
        let b = reversed.apply(&table).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn empty_table_propagates_through_every_stage() {
        let spec = FilterSpec {
            age_min: 90.0,
            age_max: 99.0,
            selections: vec![
                ("job".into(), wildcard()),
                ("housing".into(), values(&["yes"])),
            ],
        };
        let out = spec.apply(&campaign_table()).unwrap();
        assert!(out.is_empty());
    }
}
