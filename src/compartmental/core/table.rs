//! Simulation table and query-result series.
//!
//! Purpose
//! -------
//! [`TimeSeriesTable`] is the append-only record of a simulation: one row per
//! integration step (plus the initial-condition row), indexed by float days
//! since simulation start, one column per compartment. It is the only mutable
//! state a running model owns and is written exclusively by the run loop.
//!
//! [`TimeSeries`] is the immutable carrier handed out by column queries: a
//! value vector with either a float-day or a calendar-date index, depending on
//! the transforms applied.
//!
//! Invariants
//! ----------
//! - Table times are strictly increasing; `push_row` asserts it (a violation
//!   is a run-loop bug, not a user error).
//! - Row width equals the compartment count fixed at construction.
//! - Rows are never mutated or removed after being appended.

use jiff::civil::Date;
use ndarray::{Array1, ArrayView1};

/// Append-only, time-indexed record of simulated state vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesTable {
    columns: &'static [&'static str],
    times: Vec<f64>,
    /// Row-major storage; `values.len() == times.len() * columns.len()`.
    values: Vec<f64>,
}

impl TimeSeriesTable {
    /// Create a table holding the initial-condition row at time `t0`.
    ///
    /// # Panics
    /// Panics if the initial row width differs from the column count
    /// (construction-site bug).
    pub fn new(columns: &'static [&'static str], t0: f64, initial_row: ArrayView1<f64>) -> Self {
        assert_eq!(initial_row.len(), columns.len(), "row width must match column count");
        TimeSeriesTable {
            columns,
            times: vec![t0],
            values: initial_row.to_vec(),
        }
    }

    /// Column names in state-vector order.
    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// Number of rows (steps simulated + 1).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false: a table is born with its initial row.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The float-day index.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Append a row at time `t`.
    ///
    /// # Panics
    /// Panics if `t` does not extend the strictly increasing index or the row
    /// width is wrong; both are run-loop bugs.
    pub fn push_row(&mut self, t: f64, row: ArrayView1<f64>) {
        assert!(
            t > *self.times.last().unwrap_or(&f64::NEG_INFINITY),
            "time index must be strictly increasing"
        );
        assert_eq!(row.len(), self.columns.len(), "row width must match column count");
        self.times.push(t);
        self.values.extend(row.iter());
    }

    /// Copy of the column at `index`.
    pub fn column(&self, index: usize) -> Array1<f64> {
        let width = self.columns.len();
        Array1::from_iter(self.values.iter().skip(index).step_by(width).copied())
    }

    /// View of row `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        let width = self.columns.len();
        ArrayView1::from(&self.values[i * width..(i + 1) * width])
    }

    /// View of the latest row.
    pub fn last_row(&self) -> ArrayView1<'_, f64> {
        self.row(self.len() - 1)
    }

    /// Per-row sum across compartments (the living population for closed
    /// models).
    pub fn row_sums(&self) -> Array1<f64> {
        Array1::from_iter((0..self.len()).map(|i| self.row(i).sum()))
    }
}

/// Time index of a query-result series: float days or calendar dates.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeIndex {
    Days(Vec<f64>),
    Dates(Vec<Date>),
}

impl TimeIndex {
    pub fn len(&self) -> usize {
        match self {
            TimeIndex::Days(v) => v.len(),
            TimeIndex::Dates(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An immutable series handed out by column queries.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub index: TimeIndex,
    pub values: Array1<f64>,
}

impl TimeSeries {
    /// Series over a float-day index.
    pub fn over_days(times: Vec<f64>, values: Array1<f64>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        TimeSeries { index: TimeIndex::Days(times), values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Float-day index, when the series has not been converted to dates.
    pub fn days(&self) -> Option<&[f64]> {
        match &self.index {
            TimeIndex::Days(v) => Some(v),
            TimeIndex::Dates(_) => None,
        }
    }

    /// Restrict to `[start, end)` rows.
    pub fn slice_rows(&self, start: usize, end: usize) -> TimeSeries {
        let end = end.min(self.len());
        let start = start.min(end);
        let index = match &self.index {
            TimeIndex::Days(v) => TimeIndex::Days(v[start..end].to_vec()),
            TimeIndex::Dates(v) => TimeIndex::Dates(v[start..end].to_vec()),
        };
        TimeSeries { index, values: self.values.slice(ndarray::s![start..end]).to_owned() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Table append/read behavior and its monotonic-time invariant. Query-level
    // transforms over TimeSeries are tested in `core::query`.
    // -------------------------------------------------------------------------

    const COLS: &[&str] = &["susceptible", "infectious", "recovered"];

    #[test]
    // Purpose
    // -------
    // A fresh table has exactly the initial row; appended rows extend times
    // and columns consistently.
    fn table_appends_rows_and_reads_columns() {
        let mut table = TimeSeriesTable::new(COLS, 0.0, array![99.0, 1.0, 0.0].view());
        table.push_row(1.0, array![98.0, 1.5, 0.5].view());
        table.push_row(2.0, array![97.0, 1.8, 1.2].view());

        assert_eq!(table.len(), 3);
        assert_eq!(table.times(), &[0.0, 1.0, 2.0]);
        assert_eq!(table.column(1), array![1.0, 1.5, 1.8]);
        assert_eq!(table.last_row().to_owned(), array![97.0, 1.8, 1.2]);
        assert_eq!(table.row_sums(), array![100.0, 100.0, 100.0]);
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    // Purpose
    // -------
    // Appending a non-advancing time is a run-loop bug and panics.
    fn table_rejects_non_monotonic_times() {
        let mut table = TimeSeriesTable::new(COLS, 5.0, array![1.0, 0.0, 0.0].view());
        table.push_row(5.0, array![1.0, 0.0, 0.0].view());
    }

    #[test]
    // Purpose
    // -------
    // Row slicing preserves the pairing between index and values.
    fn series_slicing_keeps_index_aligned() {
        let series =
            TimeSeries::over_days(vec![0.0, 1.0, 2.0, 3.0], array![10.0, 20.0, 30.0, 40.0]);

        let mid = series.slice_rows(1, 3);

        assert_eq!(mid.days().unwrap(), &[1.0, 2.0]);
        assert_eq!(mid.values, array![20.0, 30.0]);
    }
}
