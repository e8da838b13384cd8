use std::collections::BTreeMap;

use serde::Serialize;

use super::error::DataError;
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// DistributionSummary – outcome shares of one table
// ---------------------------------------------------------------------------

/// One outcome's share of the rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeShare {
    /// Raw token as stored in the dataset ("yes" / "no").
    pub value: String,
    /// Display label ("Sim" / "Não").
    pub label: String,
    /// Percentage share. Stored unrounded; rounding happens at presentation
    /// time only.
    pub percent: f64,
}

/// Percentage breakdown of a binary outcome column, entries sorted by the
/// natural order of the raw tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub entries: Vec<OutcomeShare>,
}

impl DistributionSummary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-column `outcome` / `percent` table, the canonical shape used for
    /// the summary spreadsheet downloads.
    pub fn to_table(&self) -> Table {
        Table::new(
            vec!["outcome".into(), "percent".into()],
            self.entries
                .iter()
                .map(|e| {
                    vec![
                        CellValue::String(e.label.clone()),
                        CellValue::Float(e.percent),
                    ]
                })
                .collect(),
        )
    }
}

/// Map a raw outcome token to its display label. A pure relabeling step,
/// not a semantic transform; unknown tokens pass through unchanged.
pub fn display_label(token: &str) -> String {
    match token {
        "yes" => "Sim".to_string(),
        "no" => "Não".to_string(),
        other => other.to_string(),
    }
}

/// Count the rows per distinct value of `outcome_column` and normalize to
/// percentages of the total.
///
/// A zero-row table produces an empty summary rather than an error, so a
/// filter pass that excluded everything still renders. A missing column is
/// [`DataError::ColumnNotFound`].
pub fn summarize(table: &Table, outcome_column: &str) -> Result<DistributionSummary, DataError> {
    let idx = table.require_column(outcome_column)?;
    if table.is_empty() {
        return Ok(DistributionSummary::default());
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in table.rows() {
        *counts.entry(row[idx].to_string()).or_default() += 1;
    }

    let total = table.len() as f64;
    let entries = counts
        .into_iter()
        .map(|(value, n)| OutcomeShare {
            label: display_label(&value),
            percent: n as f64 / total * 100.0,
            value,
        })
        .collect();

    Ok(DistributionSummary { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_range, apply_filter};
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    fn outcomes(tokens: &[&str]) -> Table {
        Table::new(
            vec!["age".into(), "y".into()],
            tokens
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    vec![
                        CellValue::Integer(20 + i as i64),
                        CellValue::String(t.to_string()),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let summary = summarize(&outcomes(&["yes", "no", "no", "yes", "no"]), "y").unwrap();
        let total: f64 = summary.entries.iter().map(|e| e.percent).sum();
        assert_relative_eq!(total, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn entries_follow_raw_token_order() {
        let summary = summarize(&outcomes(&["yes", "no"]), "y").unwrap();
        // "no" sorts before "yes", so Não leads.
        assert_eq!(summary.entries[0].label, "Não");
        assert_eq!(summary.entries[1].label, "Sim");
        assert_eq!(summary.entries[0].value, "no");
    }

    #[test]
    fn zero_row_table_summarizes_to_an_empty_mapping() {
        let summary = summarize(&outcomes(&[]), "y").unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn missing_outcome_column_is_an_error() {
        let err = summarize(&outcomes(&["yes"]), "target").unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound(name) if name == "target"));
    }

    #[test]
    fn age_window_then_summary_matches_the_subset() {
        let table = Table::new(
            vec!["age".into(), "y".into()],
            vec![
                vec![CellValue::Integer(25), CellValue::String("yes".into())],
                vec![CellValue::Integer(40), CellValue::String("no".into())],
                vec![CellValue::Integer(60), CellValue::String("yes".into())],
            ],
        );

        let subset = apply_range(table, "age", 30.0, 60.0).unwrap();
        assert_eq!(subset.len(), 2);

        let summary = summarize(&subset, "y").unwrap();
        assert_eq!(summary.entries.len(), 2);
        assert_relative_eq!(summary.entries[0].percent, 50.0); // Não
        assert_relative_eq!(summary.entries[1].percent, 50.0); // Sim
        assert_eq!(summary.entries[0].label, "Não");
        assert_eq!(summary.entries[1].label, "Sim");
    }

    #[test]
    fn summarizing_a_fully_filtered_table_does_not_fail() {
        let table = outcomes(&["yes", "no"]);
        let none: BTreeSet<String> = ["absent-value".to_string()].into();
        let empty = apply_filter(table, "y", &none).unwrap();
        assert!(empty.is_empty());

        let summary = summarize(&empty, "y").unwrap();
        assert!(summary.is_empty());
    }
}
