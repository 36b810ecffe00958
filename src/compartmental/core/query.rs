//! Column-query mini-language: parsing and transform dispatch.
//!
//! Purpose
//! -------
//! Queries against a model are small structured requests, not ad-hoc string
//! handling at each call site. A query is parsed once into a [`ColumnQuery`]
//! — column name, optional [`Transform`], optional row restriction — and the
//! transform is applied through one explicit `match`.
//!
//! The textual forms accepted:
//! - `"infectious"` — a bare column;
//! - `"infectious:p100k"` — column with a transform suffix;
//! - `("infectious:dates", index)` — additionally restricted to a row or row
//!   range (built with [`ColumnQuery::with_index`]).
//!
//! Key behaviors
//! -------------
//! - Unknown transform suffixes fail at parse time with
//!   [`EpiError::InvalidTransform`]; a query object can therefore be assumed
//!   valid once constructed.
//! - Transforms that re-index by calendar dates need the model's start date;
//!   without one they fail with [`EpiError::MissingStartDate`].
//! - Extractor transforms (`initial`, `final`, `max`, `min`, `peak-time`,
//!   `peak-date`) produce scalars/dates; combining them with a row
//!   restriction fails with [`EpiError::NotASeries`].
//!
//! The transform vocabulary
//! ------------------------
//! index re-scaling: `days`, `weeks`, `months`, `years`, `dates`;
//! per-population ratios: `pp`, `ppc`, `p1k`, `p10k`, `p100k`, `p1m`;
//! value coercion: `int`, `round`, `round1`, `round2`, `round3`;
//! extractors: `initial`/`first`, `final`/`last`, `max`, `min`, `peak-time`,
//! `peak-date`.

use jiff::civil::Date;
use jiff::ToSpan;

use crate::compartmental::core::table::{TimeIndex, TimeSeries};
use crate::compartmental::errors::{EpiError, EpiResult};

/// Days per index unit for the time-rescaling transforms.
const WEEK: f64 = 7.0;
const MONTH: f64 = 365.25 / 12.0;
const YEAR: f64 = 365.25;

/// A parsed transform suffix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Re-index by calendar dates (needs a start date).
    Dates,
    /// Re-scale the float index to days/weeks/months/years.
    TimeUnit(TimeUnit),
    /// Scale values per population: `factor * value / population`.
    PerPopulation(f64),
    /// Truncate values toward zero.
    Int,
    /// Round values to `decimals` places.
    Round(u8),
    /// First value of the series.
    Initial,
    /// Last value of the series.
    Final,
    /// Largest value.
    Max,
    /// Smallest value.
    Min,
    /// Float time of the largest value.
    PeakTime,
    /// Calendar date of the largest value (needs a start date).
    PeakDate,
}

/// Units for the index-rescaling transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    fn factor(self) -> f64 {
        match self {
            TimeUnit::Days => 1.0,
            TimeUnit::Weeks => WEEK,
            TimeUnit::Months => MONTH,
            TimeUnit::Years => YEAR,
        }
    }
}

impl Transform {
    /// Parse a transform suffix.
    ///
    /// # Errors
    /// [`EpiError::InvalidTransform`] for anything outside the registry.
    pub fn parse(name: &str) -> EpiResult<Transform> {
        Ok(match name {
            "dates" => Transform::Dates,
            "days" => Transform::TimeUnit(TimeUnit::Days),
            "weeks" => Transform::TimeUnit(TimeUnit::Weeks),
            "months" => Transform::TimeUnit(TimeUnit::Months),
            "years" => Transform::TimeUnit(TimeUnit::Years),
            "pp" => Transform::PerPopulation(1.0),
            "ppc" => Transform::PerPopulation(100.0),
            "p1k" => Transform::PerPopulation(1e3),
            "p10k" => Transform::PerPopulation(1e4),
            "p100k" => Transform::PerPopulation(1e5),
            "p1m" => Transform::PerPopulation(1e6),
            "int" => Transform::Int,
            "round" => Transform::Round(0),
            "round1" => Transform::Round(1),
            "round2" => Transform::Round(2),
            "round3" => Transform::Round(3),
            "initial" | "first" => Transform::Initial,
            "final" | "last" => Transform::Final,
            "max" => Transform::Max,
            "min" => Transform::Min,
            "peak-time" => Transform::PeakTime,
            "peak-date" => Transform::PeakDate,
            other => return Err(EpiError::InvalidTransform { name: other.to_string() }),
        })
    }

    fn name(self) -> &'static str {
        match self {
            Transform::Dates => "dates",
            Transform::TimeUnit(TimeUnit::Days) => "days",
            Transform::TimeUnit(TimeUnit::Weeks) => "weeks",
            Transform::TimeUnit(TimeUnit::Months) => "months",
            Transform::TimeUnit(TimeUnit::Years) => "years",
            Transform::PerPopulation(_) => "per-population",
            Transform::Int => "int",
            Transform::Round(_) => "round",
            Transform::Initial => "initial",
            Transform::Final => "final",
            Transform::Max => "max",
            Transform::Min => "min",
            Transform::PeakTime => "peak-time",
            Transform::PeakDate => "peak-date",
        }
    }
}

/// Row restriction attached to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIndex {
    /// A single row; the result is a scalar.
    Single(usize),
    /// A half-open row range `[start, end)`.
    Range(usize, usize),
}

/// Context a query needs beyond the series itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryContext {
    /// Population used by the per-population ratio transforms.
    pub population: f64,
    /// Calendar anchor of simulation time zero, when configured.
    pub start_date: Option<Date>,
}

/// Result of a column query.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Series(TimeSeries),
    Scalar(f64),
    Date(Date),
}

impl ColumnValue {
    /// The series, when the query produced one.
    pub fn into_series(self) -> EpiResult<TimeSeries> {
        match self {
            ColumnValue::Series(s) => Ok(s),
            ColumnValue::Scalar(_) => Err(EpiError::NotASeries { transform: "scalar" }),
            ColumnValue::Date(_) => Err(EpiError::NotASeries { transform: "date" }),
        }
    }

    /// The scalar, when the query produced one.
    pub fn into_scalar(self) -> EpiResult<f64> {
        match self {
            ColumnValue::Scalar(v) => Ok(v),
            _ => Err(EpiError::NotASeries { transform: "series" }),
        }
    }
}

/// A parsed column query.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnQuery {
    pub column: String,
    pub transform: Option<Transform>,
    pub index: Option<QueryIndex>,
}

impl ColumnQuery {
    /// Parse `"column"` or `"column:transform"`.
    ///
    /// The split is on the *last* colon, so future dotted or namespaced
    /// column names stay representable.
    ///
    /// # Errors
    /// [`EpiError::InvalidTransform`] when the suffix is not in the registry.
    pub fn parse(spec: &str) -> EpiResult<ColumnQuery> {
        match spec.rsplit_once(':') {
            Some((column, suffix)) if !column.is_empty() => Ok(ColumnQuery {
                column: column.replace('-', "_"),
                transform: Some(Transform::parse(suffix)?),
                index: None,
            }),
            _ => Ok(ColumnQuery {
                column: spec.replace('-', "_"),
                transform: None,
                index: None,
            }),
        }
    }

    /// Attach a row restriction.
    pub fn with_index(mut self, index: QueryIndex) -> ColumnQuery {
        self.index = Some(index);
        self
    }

    /// Apply this query's transform and row restriction to a resolved base
    /// series.
    pub fn finish(&self, series: TimeSeries, ctx: &QueryContext) -> EpiResult<ColumnValue> {
        let value = match self.transform {
            None => ColumnValue::Series(series),
            Some(t) => apply_transform(t, series, ctx)?,
        };
        match self.index {
            None => Ok(value),
            Some(idx) => restrict(value, idx),
        }
    }
}

/// Apply one transform; the single dispatch point for the whole vocabulary.
fn apply_transform(
    transform: Transform,
    series: TimeSeries,
    ctx: &QueryContext,
) -> EpiResult<ColumnValue> {
    match transform {
        Transform::Dates => Ok(ColumnValue::Series(TimeSeries {
            index: TimeIndex::Dates(to_dates(&series, ctx)?),
            values: series.values,
        })),
        Transform::TimeUnit(unit) => {
            let days = series
                .days()
                .ok_or(EpiError::NotASeries { transform: transform.name() })?;
            let factor = unit.factor();
            let index = TimeIndex::Days(days.iter().map(|t| t / factor).collect());
            Ok(ColumnValue::Series(TimeSeries { index, values: series.values }))
        }
        Transform::PerPopulation(factor) => Ok(ColumnValue::Series(TimeSeries {
            values: series.values.mapv(|v| factor * v / ctx.population),
            index: series.index,
        })),
        Transform::Int => Ok(ColumnValue::Series(TimeSeries {
            values: series.values.mapv(f64::trunc),
            index: series.index,
        })),
        Transform::Round(decimals) => {
            let scale = 10f64.powi(decimals as i32);
            Ok(ColumnValue::Series(TimeSeries {
                values: series.values.mapv(|v| (v * scale).round() / scale),
                index: series.index,
            }))
        }
        Transform::Initial => Ok(ColumnValue::Scalar(series.values[0])),
        Transform::Final => Ok(ColumnValue::Scalar(series.values[series.len() - 1])),
        Transform::Max => Ok(ColumnValue::Scalar(
            series.values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )),
        Transform::Min => Ok(ColumnValue::Scalar(
            series.values.iter().copied().fold(f64::INFINITY, f64::min),
        )),
        Transform::PeakTime => {
            let days = series
                .days()
                .ok_or(EpiError::NotASeries { transform: transform.name() })?;
            Ok(ColumnValue::Scalar(days[argmax(&series)]))
        }
        Transform::PeakDate => {
            let dates = to_dates(&series, ctx)?;
            Ok(ColumnValue::Date(dates[argmax(&series)]))
        }
    }
}

fn restrict(value: ColumnValue, index: QueryIndex) -> EpiResult<ColumnValue> {
    let series = match value {
        ColumnValue::Series(s) => s,
        ColumnValue::Scalar(_) => return Err(EpiError::NotASeries { transform: "scalar" }),
        ColumnValue::Date(_) => return Err(EpiError::NotASeries { transform: "date" }),
    };
    match index {
        QueryIndex::Single(i) => {
            if i >= series.len() {
                return Err(EpiError::IndexOutOfRange { index: i, len: series.len() });
            }
            Ok(ColumnValue::Scalar(series.values[i]))
        }
        QueryIndex::Range(start, end) => {
            if start > series.len() || end > series.len() || start > end {
                return Err(EpiError::IndexOutOfRange { index: end, len: series.len() });
            }
            Ok(ColumnValue::Series(series.slice_rows(start, end)))
        }
    }
}

fn argmax(series: &TimeSeries) -> usize {
    let mut best = 0;
    for (i, &v) in series.values.iter().enumerate() {
        if v > series.values[best] {
            best = i;
        }
    }
    best
}

fn to_dates(series: &TimeSeries, ctx: &QueryContext) -> EpiResult<Vec<Date>> {
    let start = ctx.start_date.ok_or(EpiError::MissingStartDate)?;
    let days = series
        .days()
        .ok_or(EpiError::NotASeries { transform: "dates" })?;
    Ok(days
        .iter()
        .map(|&t| {
            start
                .checked_add((t.round() as i64).days())
                .expect("date offset within the civil range")
        })
        .collect())
}
