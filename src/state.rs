use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::color::OutcomeColors;
use crate::data::error::DataError;
use crate::data::filter::{FilterSpec, SELECT_ALL};
use crate::data::model::{Table, AGE_COLUMN, CATEGORICAL_COLUMNS, EXPECTED_COLUMNS, OUTCOME_COLUMN};
use crate::data::summary::{summarize, DistributionSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart style for the outcome distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Pie,
}

/// The full UI state, independent of rendering. One instance per window,
/// so each session's tables are isolated by construction.
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub raw: Option<Table>,
    /// Outcome distribution of the raw dataset.
    pub raw_summary: DistributionSummary,

    /// Subset produced by the last applied filter pass.
    pub filtered: Option<Table>,
    /// Outcome distribution of the subset.
    pub filtered_summary: DistributionSummary,

    /// Chart style chosen in the form.
    pub chart_kind: ChartKind,
    /// Slider bounds, taken from the data's own age span.
    pub age_bounds: (i64, i64),
    /// Current inclusive range, kept ordered (`age_min ≤ age_max`).
    pub age_min: i64,
    pub age_max: i64,
    /// Multiselect options per categorical column, wildcard entry first.
    pub options: Vec<(String, Vec<String>)>,
    /// Pending selections per categorical column.
    pub selections: BTreeMap<String, BTreeSet<String>>,

    /// Colour per outcome label, shared by charts and tables.
    pub outcome_colors: OutcomeColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Last applied filter parameters. Resubmitting the form unchanged is
    /// a no-op (pure-function memoization keyed on exact inputs).
    last_applied: Option<FilterSpec>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            raw: None,
            raw_summary: DistributionSummary::default(),
            filtered: None,
            filtered_summary: DistributionSummary::default(),
            chart_kind: ChartKind::Bar,
            age_bounds: (18, 95),
            age_min: 18,
            age_max: 95,
            options: Vec::new(),
            selections: BTreeMap::new(),
            outcome_colors: OutcomeColors::default(),
            status_message: None,
            last_applied: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: check the expected columns, derive the
    /// slider bounds and multiselect options, summarize the raw outcome
    /// distribution, and run one initial filter pass.
    ///
    /// A missing column aborts ingestion; the previous dataset stays in
    /// place rather than proceeding with a degraded result.
    pub fn set_dataset(&mut self, table: Table) -> Result<(), DataError> {
        table.require_columns(EXPECTED_COLUMNS)?;

        let (lo, hi) = table
            .numeric_bounds(AGE_COLUMN)?
            .map(|(lo, hi)| (lo.floor() as i64, hi.ceil() as i64))
            .unwrap_or((18, 95));

        let mut options = Vec::with_capacity(CATEGORICAL_COLUMNS.len());
        let mut selections = BTreeMap::new();
        for &column in CATEGORICAL_COLUMNS {
            let mut entries = vec![SELECT_ALL.to_string()];
            entries.extend(table.unique_strings(column)?);
            options.push((column.to_string(), entries));
            selections.insert(column.to_string(), BTreeSet::from([SELECT_ALL.to_string()]));
        }

        let raw_summary = summarize(&table, OUTCOME_COLUMN)?;
        self.outcome_colors =
            OutcomeColors::new(raw_summary.entries.iter().map(|e| e.label.clone()));

        self.raw_summary = raw_summary;
        self.age_bounds = (lo, hi);
        self.age_min = lo;
        self.age_max = hi;
        self.options = options;
        self.selections = selections;
        self.raw = Some(table);
        self.filtered = None;
        self.filtered_summary = DistributionSummary::default();
        self.last_applied = None;
        self.status_message = None;

        self.apply_filters()
    }

    /// The filter parameters currently staged in the form, with the
    /// categorical columns in their fixed configuration order.
    pub fn current_spec(&self) -> FilterSpec {
        FilterSpec {
            age_min: self.age_min as f64,
            age_max: self.age_max as f64,
            selections: CATEGORICAL_COLUMNS
                .iter()
                .map(|&column| {
                    (
                        column.to_string(),
                        self.selections.get(column).cloned().unwrap_or_default(),
                    )
                })
                .collect(),
        }
    }

    /// One full recomputation pass over the raw table, triggered by the
    /// form's Apply button. Skipped when the parameters are identical to
    /// the previously applied ones.
    pub fn apply_filters(&mut self) -> Result<(), DataError> {
        let Some(raw) = &self.raw else {
            return Ok(());
        };
        let spec = self.current_spec();
        if self.last_applied.as_ref() == Some(&spec) {
            return Ok(());
        }

        let subset = spec.apply(raw)?;
        self.filtered_summary = summarize(&subset, OUTCOME_COLUMN)?;
        log::info!(
            "filter pass: {} of {} rows remain",
            subset.len(),
            raw.len()
        );
        self.filtered = Some(subset);
        self.last_applied = Some(spec);
        Ok(())
    }

    /// Keep the age range ordered after either slider moves.
    pub fn clamp_age_range(&mut self) {
        if self.age_min > self.age_max {
            std::mem::swap(&mut self.age_min, &mut self.age_max);
        }
    }

    /// Toggle a single entry in a column's multiselect.
    pub fn toggle_selection(&mut self, column: &str, value: &str) {
        let selected = self.selections.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Reset a column to the wildcard (no restriction).
    pub fn select_all(&mut self, column: &str) {
        self.selections.insert(
            column.to_string(),
            BTreeSet::from([SELECT_ALL.to_string()]),
        );
    }

    /// Clear a column's selection entirely (matches nothing).
    pub fn select_none(&mut self, column: &str) {
        self.selections.insert(column.to_string(), BTreeSet::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn sample_csv() -> &'static [u8] {
        b"age;job;marital;default;housing;loan;contact;month;day_of_week;y\n\
          25;admin.;single;no;yes;no;cellular;may;mon;yes\n\
          40;technician;married;no;no;no;telephone;jun;tue;no\n\
          60;retired;married;no;yes;yes;cellular;jul;wed;yes\n"
    }

    #[test]
    fn ingesting_a_dataset_initialises_the_form() {
        let mut state = AppState::default();
        state.set_dataset(load_bytes(sample_csv()).unwrap()).unwrap();

        assert_eq!(state.age_bounds, (25, 60));
        assert_eq!(state.options.len(), CATEGORICAL_COLUMNS.len());
        // Wildcard leads every option list and is the default selection.
        assert_eq!(state.options[0].1[0], SELECT_ALL);
        assert!(state.selections["job"].contains(SELECT_ALL));
        // The initial pass keeps everything.
        assert_eq!(state.filtered.as_ref().unwrap().len(), 3);
        assert!(!state.raw_summary.is_empty());
    }

    #[test]
    fn ingesting_a_dataset_with_missing_columns_is_refused() {
        let mut state = AppState::default();
        let table = load_bytes(b"age;job\n40;admin.\n").unwrap();
        let err = state.set_dataset(table).unwrap_err();
        assert!(matches!(err, DataError::ColumnNotFound(_)));
        assert!(state.raw.is_none());
    }

    #[test]
    fn apply_is_memoized_on_identical_parameters() {
        let mut state = AppState::default();
        state.set_dataset(load_bytes(sample_csv()).unwrap()).unwrap();

        state.age_min = 30;
        state.apply_filters().unwrap();
        let first = state.filtered.clone();

        // Unchanged parameters: the pass short-circuits and the subset is
        // bit-for-bit the same object state.
        state.apply_filters().unwrap();
        assert_eq!(state.filtered, first);
        assert_eq!(first.unwrap().len(), 2);
    }

    #[test]
    fn narrowing_a_multiselect_restricts_the_subset() {
        let mut state = AppState::default();
        state.set_dataset(load_bytes(sample_csv()).unwrap()).unwrap();

        state.select_none("job");
        state.toggle_selection("job", "retired");
        state.apply_filters().unwrap();

        let filtered = state.filtered.as_ref().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(state.filtered_summary.entries.len(), 1);
        assert_eq!(state.filtered_summary.entries[0].label, "Sim");
    }
}
