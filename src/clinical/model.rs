//! The clinical-model contract: observer overlays on an infection model.
//!
//! Purpose
//! -------
//! A clinical model turns the infection curves of a wrapped
//! [`EpiModel`] into hospitalization, ICU, and death curves. Observer models
//! never advance time themselves — they borrow the infection model immutably
//! and recompute every column from its *current* table on each access, so a
//! longer run on the infection model (after the overlay is dropped) is
//! reflected by simply rebuilding the overlay. There is no cache to
//! invalidate.
//!
//! Contract
//! --------
//! [`ClinicalModel`] provides the shared column algebra (cases, empirical
//! fatality ratios, death rate, the hospitalized/ICU aliases) on top of five
//! required hooks: `deaths`, `severe`, `severe_cases`, `critical`,
//! `critical_cases`. A concrete model implements the hooks it supports; the
//! defaults report [`EpiError::UnsupportedColumn`], which marks an unhonored
//! contract — catch it when wiring a model, not in production queries.
//!
//! Queries
//! -------
//! [`ClinicalModel::get`] speaks the same `"column:transform"` mini-language
//! as the infection model. Resolution order: subtype-specific columns
//! ([`ClinicalModel::extra_column`]), the shared clinical columns, clinical
//! parameters broadcast as constant series, and finally the wrapped
//! infection model's own resolution chain (compartments, epidemic
//! parameters).

use ndarray::Array1;

use crate::clinical::params::ClinicalParams;
use crate::compartmental::core::query::{ColumnQuery, ColumnValue, QueryIndex};
use crate::compartmental::core::table::TimeSeries;
use crate::compartmental::errors::{EpiError, EpiResult};
use crate::compartmental::models::EpiModel;

/// Observer contract over a borrowed infection model.
pub trait ClinicalModel {
    /// The wrapped infection model.
    fn infection(&self) -> &EpiModel;

    /// This overlay's clinical parameters.
    fn clinical_params(&self) -> &ClinicalParams;

    /// Concrete model name, used in unsupported-column errors.
    fn model_name(&self) -> &'static str;

    /// Subtype-specific columns checked before the shared vocabulary.
    /// Return `None` to fall through.
    fn extra_column(&self, name: &str) -> Option<EpiResult<Array1<f64>>> {
        let _ = name;
        None
    }

    // ---- Required hooks (default: contract violation) ----

    /// Cumulative deaths.
    fn deaths(&self) -> EpiResult<Array1<f64>> {
        Err(EpiError::UnsupportedColumn { model: self.model_name(), name: "deaths" })
    }

    /// Severe cases currently in the severe state.
    fn severe(&self) -> EpiResult<Array1<f64>> {
        Err(EpiError::UnsupportedColumn { model: self.model_name(), name: "severe" })
    }

    /// Cumulative severe cases.
    fn severe_cases(&self) -> EpiResult<Array1<f64>> {
        Err(EpiError::UnsupportedColumn { model: self.model_name(), name: "severe_cases" })
    }

    /// Critical cases currently in the critical state.
    fn critical(&self) -> EpiResult<Array1<f64>> {
        Err(EpiError::UnsupportedColumn { model: self.model_name(), name: "critical" })
    }

    /// Cumulative critical cases.
    fn critical_cases(&self) -> EpiResult<Array1<f64>> {
        Err(EpiError::UnsupportedColumn { model: self.model_name(), name: "critical_cases" })
    }

    // ---- Provided columns ----

    /// Float-day index of the wrapped model's table.
    fn times(&self) -> Vec<f64> {
        self.infection().table_times().map(<[f64]>::to_vec).unwrap_or_default()
    }

    /// Growth factor used for backward extrapolation in delay transforms.
    fn growth_factor(&self) -> EpiResult<f64> {
        self.infection().growth_factor()
    }

    /// Cumulative (symptomatic) cases from the infection model.
    fn cases(&self) -> EpiResult<Array1<f64>> {
        Ok(self.infection().base_column("cases")?.values)
    }

    /// Cumulative infections. Families without an asymptomatic split report
    /// their cases.
    fn infected(&self) -> EpiResult<Array1<f64>> {
        self.cases()
    }

    /// Infectious population from the infection model; the starting point of
    /// every clinical curve.
    fn infectious(&self) -> EpiResult<Array1<f64>> {
        Ok(self.infection().base_column("infectious")?.values)
    }

    /// Living population: the infection model's total minus cumulative
    /// deaths.
    fn population(&self) -> EpiResult<Array1<f64>> {
        let n = self.infection().base_column("N")?.values;
        let deaths = self.deaths()?;
        Ok(n - deaths)
    }

    /// Deaths per case so far; zero where no cases have occurred yet.
    fn empirical_cfr(&self) -> EpiResult<Array1<f64>> {
        let deaths = self.deaths()?;
        let cases = self.cases()?;
        Ok(safe_ratio(deaths, cases))
    }

    /// Deaths per infection so far; zero where no infections yet.
    fn empirical_ifr(&self) -> EpiResult<Array1<f64>> {
        let deaths = self.deaths()?;
        let infected = self.infected()?;
        Ok(safe_ratio(deaths, infected))
    }

    /// Daily deaths: first difference of the cumulative curve.
    fn death_rate(&self) -> EpiResult<Array1<f64>> {
        let deaths = self.deaths()?;
        let mut rate = Array1::zeros(deaths.len());
        for i in 1..deaths.len() {
            rate[i] = deaths[i] - deaths[i - 1];
        }
        Ok(rate)
    }

    /// Cases occupying a hospital bed; equal to the severe population unless
    /// a capacity-aware model narrows it.
    fn hospitalized(&self) -> EpiResult<Array1<f64>> {
        self.severe()
    }

    /// Cumulative hospitalizations; severe cases unless narrowed.
    fn hospitalized_cases(&self) -> EpiResult<Array1<f64>> {
        self.severe_cases()
    }

    /// ICU occupancy; the critical population unless narrowed.
    fn icu(&self) -> EpiResult<Array1<f64>> {
        self.critical()
    }

    /// Cumulative ICU cases; critical cases unless narrowed.
    fn icu_cases(&self) -> EpiResult<Array1<f64>> {
        self.critical_cases()
    }

    // ---- Query interface ----

    /// Resolve a bare clinical column name.
    ///
    /// [`EpiError::UnknownColumn`] signals "not a clinical column" and lets
    /// [`get`](Self::get) fall through to parameters and the infection model.
    fn clinical_column(&self, name: &str) -> EpiResult<Array1<f64>> {
        if let Some(result) = self.extra_column(name) {
            return result;
        }
        match name {
            "deaths" | "D" => self.deaths(),
            "death_rate" => self.death_rate(),
            "severe" => self.severe(),
            "severe_cases" => self.severe_cases(),
            "critical" => self.critical(),
            "critical_cases" => self.critical_cases(),
            "hospitalized" | "H" => self.hospitalized(),
            "hospitalized_cases" => self.hospitalized_cases(),
            "icu" => self.icu(),
            "icu_cases" => self.icu_cases(),
            "cases" => self.cases(),
            "infected" => self.infected(),
            "infectious" => self.infectious(),
            "empirical_CFR" => self.empirical_cfr(),
            "empirical_IFR" => self.empirical_ifr(),
            "population" => self.population(),
            other => Err(EpiError::UnknownColumn { name: other.to_string() }),
        }
    }

    /// Run a column query (`"name"` or `"name:transform"`).
    fn get(&self, spec: &str) -> EpiResult<ColumnValue> {
        let query = ColumnQuery::parse(spec)?;
        self.query(&query)
    }

    /// Run a column query restricted to a row or row range.
    fn get_at(&self, spec: &str, index: QueryIndex) -> EpiResult<ColumnValue> {
        let query = ColumnQuery::parse(spec)?.with_index(index);
        self.query(&query)
    }

    /// Convenience: run a query expected to produce a series.
    fn get_series(&self, spec: &str) -> EpiResult<TimeSeries> {
        self.get(spec)?.into_series()
    }

    /// Execute a parsed query against this overlay.
    fn query(&self, query: &ColumnQuery) -> EpiResult<ColumnValue> {
        let series = match self.clinical_column(&query.column) {
            Ok(values) => TimeSeries::over_days(self.times(), values),
            Err(EpiError::UnknownColumn { .. }) => {
                match self.clinical_params().value_of(&query.column) {
                    Some(value) => {
                        let times = self.times();
                        let values = Array1::from_elem(times.len(), value);
                        TimeSeries::over_days(times, values)
                    }
                    None => self.infection().base_column(&query.column)?,
                }
            }
            Err(other) => return Err(other),
        };
        let ctx = self.infection().query_context();
        query.finish(series, &ctx)
    }
}

/// Elementwise `num / den` with `0` wherever the denominator is zero.
fn safe_ratio(num: Array1<f64>, den: Array1<f64>) -> Array1<f64> {
    let mut out = Array1::zeros(num.len());
    for i in 0..num.len() {
        if den[i] != 0.0 {
            out[i] = num[i] / den[i];
        }
    }
    out
}

/// Shared initialization check for clinical constructors: the wrapped model
/// must already own its simulation table.
pub(crate) fn require_initialized(infection: &EpiModel) -> EpiResult<()> {
    if infection.table_times().is_none() {
        return Err(EpiError::Uninitialized { model: infection.name().to_string() });
    }
    Ok(())
}
