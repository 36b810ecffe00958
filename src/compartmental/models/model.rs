//! The compartmental model: state, run loop, and column queries.
//!
//! Purpose
//! -------
//! [`EpiModel`] ties the core pieces together: a [`ModelFamily`] fixing the
//! state layout, a [`ParamSet`], a dynamics implementation (ODE integration
//! or the closed-form linearized SIR), an initial-condition policy, and the
//! append-only simulation table. Optional collaborators — a [`Region`] for
//! population/capacity data and a [`Disease`] for parameter defaults — are
//! consulted at construction and never own any simulation state.
//!
//! Lifecycle
//! ---------
//! A model moves through three phases:
//!
//! 1. **Uninitialized** — constructed, no state vector, no table.
//! 2. **Initialized** — [`ensure_initialized`](EpiModel::ensure_initialized)
//!    has computed the `t = 0` state (explicit vector, case-count
//!    back-calculation, or the one-seed default) and created the table with
//!    its single initial row.
//! 3. **Running** — [`run`](EpiModel::run) has appended rows; the state
//!    vector always mirrors the latest row.
//!
//! Every public entry point calls `ensure_initialized` first, so querying a
//! column before any `run` is valid and returns the initial row — a
//! deliberate convenience, not an error.
//!
//! Column queries
//! --------------
//! `model.get("name")` resolves, in order: (1) a model-derived column
//! (`cases`, `resolved_cases`, `force`, `N`/`population`), (2) a compartment
//! (canonical name or single-letter alias), (3) a parameter name broadcast
//! as a constant series. Anything else is
//! [`EpiError::UnknownColumn`]. Transform suffixes and row restrictions ride
//! on top; see [`crate::compartmental::core::query`].
//!
//! Concurrency
//! -----------
//! Single-owner, single-thread. `run` takes `&mut self`; clinical overlays
//! borrow the model immutably, so the borrow checker rules out observing a
//! model mid-mutation.

use jiff::civil::Date;
use ndarray::Array1;

use crate::compartmental::core::formulas::ModelFamily;
use crate::compartmental::core::params::{DerivedParam, ParamId, ParamSet, PrimaryParam};
use crate::compartmental::core::query::{ColumnQuery, ColumnValue, QueryContext, QueryIndex};
use crate::compartmental::core::solver::{self, OdeOptions, Rate, RateSet};
use crate::compartmental::core::table::{TimeSeries, TimeSeriesTable};
use crate::compartmental::errors::{EpiError, EpiResult, ParamError};
use crate::compartmental::models::analytic::fill_linearized_sir;
use crate::disease::Disease;
use crate::region::Region;
use crate::utils::cumtrapz;

/// How the model advances time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dynamics {
    /// Numerical integration of the family ODE system.
    Ode(OdeOptions),
    /// Closed-form linearized SIR (only meaningful with
    /// [`ModelFamily::Sir`]).
    LinearizedSir,
}

/// Where the `t = 0` state comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialCondition {
    /// One seed individual in compartment 1 (infectious for SIR, exposed for
    /// the staged families), the rest susceptible.
    Default,
    /// An explicit state vector in family order.
    State(Array1<f64>),
    /// Back-calculation from a cumulative case count via the
    /// exponential-regime estimators (requires `R0 > 1`).
    Cases(f64),
}

/// Per-rate time-varying overrides installed on a model.
#[derive(Debug, Clone, Default)]
struct RateOverrides {
    r0: Option<Rate>,
    gamma: Option<Rate>,
    sigma: Option<Rate>,
    rho: Option<Rate>,
    prob_symptoms: Option<Rate>,
}

/// Owned simulation state; absent until first initialization.
#[derive(Debug, Clone)]
struct Runtime {
    state: Array1<f64>,
    time: f64,
    table: TimeSeriesTable,
}

/// A compartmental epidemic model.
#[derive(Debug, Clone)]
pub struct EpiModel {
    name: String,
    family: ModelFamily,
    dynamics: Dynamics,
    params: ParamSet,
    init: InitialCondition,
    population: f64,
    region: Option<Region>,
    start_date: Option<Date>,
    overrides: RateOverrides,
    runtime: Option<Runtime>,
}

impl EpiModel {
    /// Default population when neither a region nor an explicit value is
    /// given; matches the one-in-a-million default seed.
    pub const DEFAULT_POPULATION: f64 = 1e6;

    fn with_family(family: ModelFamily, dynamics: Dynamics) -> Self {
        EpiModel {
            name: format!("{} model", family.name()),
            family,
            dynamics,
            params: ParamSet::for_family(family),
            init: InitialCondition::Default,
            population: Self::DEFAULT_POPULATION,
            region: None,
            start_date: None,
            overrides: RateOverrides::default(),
            runtime: None,
        }
    }

    /// SIR model with RK4 dynamics and family defaults.
    pub fn sir() -> Self {
        Self::with_family(ModelFamily::Sir, Dynamics::Ode(OdeOptions::default()))
    }

    /// SEIR model with RK4 dynamics and family defaults.
    pub fn seir() -> Self {
        Self::with_family(ModelFamily::Seir, Dynamics::Ode(OdeOptions::default()))
    }

    /// SEAIR model with RK4 dynamics and family defaults.
    pub fn seair() -> Self {
        Self::with_family(ModelFamily::Seair, Dynamics::Ode(OdeOptions::default()))
    }

    /// Linearized SIR (`eSIR`): exact exponential dynamics around the
    /// run-start state.
    pub fn esir() -> Self {
        Self::with_family(ModelFamily::Sir, Dynamics::LinearizedSir)
    }

    // ---- Builder-style configuration ----

    /// Rename the model (appears in summaries and error context only).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Take parameter defaults from a disease table.
    pub fn with_disease(mut self, disease: &Disease) -> Self {
        self.params = disease.epidemic_params(self.family);
        self
    }

    /// Attach a region; its population becomes the model population.
    pub fn with_region(mut self, region: Region) -> Self {
        self.population = region.population;
        self.region = Some(region);
        self
    }

    /// Set the population explicitly (overrides a region's).
    pub fn with_population(mut self, population: f64) -> Self {
        self.population = population;
        self
    }

    /// Anchor simulation time zero on a calendar date.
    pub fn with_start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Replace the whole parameter set.
    pub fn with_params(mut self, params: ParamSet) -> Self {
        self.params = params;
        self
    }

    /// Initialize from an explicit state vector (family order).
    pub fn with_state(mut self, state: Array1<f64>) -> Self {
        self.init = InitialCondition::State(state);
        self
    }

    /// Initialize by back-calculating from a cumulative case count.
    pub fn with_cases(mut self, cases: f64) -> Self {
        self.init = InitialCondition::Cases(cases);
        self
    }

    /// Replace the integrator options (no effect on the linearized model).
    pub fn with_ode_options(mut self, options: OdeOptions) -> Self {
        if let Dynamics::Ode(_) = self.dynamics {
            self.dynamics = Dynamics::Ode(options);
        }
        self
    }

    /// Set a parameter by name (aliases resolve; derived parameters
    /// back-solve their primary).
    pub fn set_param(&mut self, name: &str, value: f64) -> EpiResult<()> {
        self.params.set_named(name, value)?;
        Ok(())
    }

    /// Install a time-varying rate override, e.g. an intervention that cuts
    /// `R0` after day 30. Accepted names: `R0`, `gamma`, `sigma`, `rho`,
    /// `prob_symptoms`.
    pub fn set_time_varying(
        &mut self,
        name: &str,
        f: std::sync::Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    ) -> EpiResult<()> {
        let rate = Some(Rate::TimeVarying(f));
        match name {
            "R0" => self.overrides.r0 = rate,
            "gamma" => self.overrides.gamma = rate,
            "sigma" => self.overrides.sigma = rate,
            "rho" => self.overrides.rho = rate,
            "prob_symptoms" | "Qs" => self.overrides.prob_symptoms = rate,
            other => {
                return Err(ParamError::UnknownParameter { name: other.to_string() }.into());
            }
        }
        Ok(())
    }

    // ---- Accessors ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// Population the model was configured with.
    pub fn population(&self) -> f64 {
        self.population
    }

    /// Current simulation time in days (0 before any run).
    pub fn time(&self) -> f64 {
        self.runtime.as_ref().map_or(0.0, |r| r.time)
    }

    /// Whether the initial condition has been materialized.
    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    /// Early-epidemic growth factor `K` under the current parameters.
    pub fn growth_factor(&self) -> EpiResult<f64> {
        Ok(self.params.get(ParamId::Derived(DerivedParam::K))?)
    }

    /// Compute the `t = 0` state and create the simulation table.
    ///
    /// Idempotent; called implicitly by every public entry point. Explicit
    /// calls make the Uninitialized → Initialized transition visible at a
    /// chosen program point.
    ///
    /// # Errors
    /// - [`ParamError::InvalidParameter`] via [`EpiError::Param`] for an
    ///   explicit state vector of the wrong length, or for case-count
    ///   initialization with `R0 <= 1`.
    pub fn ensure_initialized(&mut self) -> EpiResult<()> {
        if self.runtime.is_some() {
            return Ok(());
        }
        let n = self.family.n_compartments();
        let state = match &self.init {
            InitialCondition::Default => {
                let mut x0 = Array1::zeros(n);
                x0[0] = self.population - 1.0;
                x0[1] = 1.0;
                x0
            }
            InitialCondition::State(x0) => {
                if x0.len() != n {
                    return Err(ParamError::InvalidParameter {
                        name: "state",
                        value: x0.len() as f64,
                        reason: "state length must match the family compartment count",
                    }
                    .into());
                }
                x0.clone()
            }
            InitialCondition::Cases(cases) => {
                self.family.state_from_cases(self.population, *cases, &self.params)?
            }
        };
        log::debug!(
            "initializing {} with state {:?} at t=0",
            self.name,
            state.as_slice().unwrap_or(&[])
        );
        let table = TimeSeriesTable::new(self.family.compartments(), 0.0, state.view());
        self.runtime = Some(Runtime { state, time: 0.0, table });
        Ok(())
    }

    /// Advance the simulation by `duration` days in unit steps, appending one
    /// row per day.
    ///
    /// Repeated calls accumulate; the table always holds `steps + 1` rows
    /// including the initial condition.
    pub fn run(&mut self, duration: u32) -> EpiResult<()> {
        self.ensure_initialized()?;
        if duration == 0 {
            return Ok(());
        }
        let rates = self.build_rates()?;
        let runtime = self.runtime.as_mut().expect("initialized above");
        let t0 = runtime.time;
        log::debug!("running {} for {duration} days from t={t0}", self.name);

        match self.dynamics {
            Dynamics::Ode(options) => {
                for step in 1..=duration {
                    let t1 = t0 + f64::from(step);
                    solver::advance(
                        self.family,
                        &rates,
                        options,
                        &mut runtime.state,
                        t1 - 1.0,
                        t1,
                    );
                    runtime.table.push_row(t1, runtime.state.view());
                }
            }
            Dynamics::LinearizedSir => {
                // The linearized solution freezes the susceptible fraction at
                // the run-start state, so the whole run is one batch fill.
                let values = rates.at(t0);
                let ts_rel: Vec<f64> = (1..=duration).map(f64::from).collect();
                let rows =
                    fill_linearized_sir(values.r0, values.gamma, runtime.state.view(), &ts_rel);
                for (row, &t_rel) in rows.into_iter().zip(&ts_rel) {
                    runtime.table.push_row(t0 + t_rel, row.view());
                    runtime.state = row;
                }
            }
        }
        runtime.time = t0 + f64::from(duration);
        Ok(())
    }

    // ---- Column queries ----

    /// Run a column query (`"name"` or `"name:transform"`).
    pub fn get(&mut self, spec: &str) -> EpiResult<ColumnValue> {
        let query = ColumnQuery::parse(spec)?;
        self.query(&query)
    }

    /// Run a column query restricted to a row or row range.
    pub fn get_at(&mut self, spec: &str, index: QueryIndex) -> EpiResult<ColumnValue> {
        let query = ColumnQuery::parse(spec)?.with_index(index);
        self.query(&query)
    }

    /// Convenience: run a query expected to produce a series.
    pub fn get_series(&mut self, spec: &str) -> EpiResult<TimeSeries> {
        self.get(spec)?.into_series()
    }

    /// Execute a parsed query.
    pub fn query(&mut self, query: &ColumnQuery) -> EpiResult<ColumnValue> {
        self.ensure_initialized()?;
        let series = self.base_column(&query.column)?;
        let ctx = self.query_context();
        query.finish(series, &ctx)
    }

    /// Float-day index of the simulation table; `None` before initialization.
    pub(crate) fn table_times(&self) -> Option<&[f64]> {
        self.runtime.as_ref().map(|r| r.table.times())
    }

    /// Query context shared with clinical overlays.
    pub(crate) fn query_context(&self) -> QueryContext {
        let population = self
            .runtime
            .as_ref()
            .map_or(self.population, |r| r.table.row(0).sum());
        QueryContext { population, start_date: self.start_date }
    }

    /// Resolve a bare column name to its base series.
    ///
    /// Resolution order: model-derived columns, then compartments (with
    /// aliases), then parameters broadcast across the time index.
    pub(crate) fn base_column(&self, name: &str) -> EpiResult<TimeSeries> {
        let runtime = self.runtime.as_ref().ok_or_else(|| EpiError::Uninitialized {
            model: self.name.clone(),
        })?;
        let times = runtime.table.times().to_vec();

        match name {
            "cases" => return Ok(TimeSeries::over_days(times, self.cases_column(runtime)?)),
            "resolved_cases" => {
                return Ok(TimeSeries::over_days(times, self.resolved_cases_column(runtime)?))
            }
            "force" => return Ok(TimeSeries::over_days(times, self.force_column(runtime)?)),
            "N" | "population" => {
                return Ok(TimeSeries::over_days(times, runtime.table.row_sums()))
            }
            _ => {}
        }

        if let Some(idx) = self.family.compartment_index(name) {
            return Ok(TimeSeries::over_days(times, runtime.table.column(idx)));
        }

        if let Ok(id) = ParamId::parse(name) {
            if let Ok(value) = self.params.get(id) {
                let values = Array1::from_elem(times.len(), value);
                return Ok(TimeSeries::over_days(times, values));
            }
        }

        Err(EpiError::UnknownColumn { name: name.to_string() })
    }

    /// Cumulative cases: trapezoid of new infections (`force · S`), seeded
    /// with the initial infectious count.
    fn cases_column(&self, runtime: &Runtime) -> EpiResult<Array1<f64>> {
        let infectious_idx = self
            .family
            .compartment_index("infectious")
            .expect("every family has an infectious compartment");
        let i0 = runtime.table.row(0)[infectious_idx];
        let force = self.force_column(runtime)?;
        let susceptible = runtime.table.column(0);
        let infections = &force * &susceptible;
        Ok(cumtrapz(
            infections.view(),
            ndarray::ArrayView1::from(runtime.table.times()),
            i0,
        ))
    }

    /// Cumulative removals: trapezoid of the infectious curve scaled by
    /// `gamma`.
    fn resolved_cases_column(&self, runtime: &Runtime) -> EpiResult<Array1<f64>> {
        let gamma = self.params.get(ParamId::Derived(DerivedParam::Gamma))?;
        let infectious_idx = self
            .family
            .compartment_index("infectious")
            .expect("every family has an infectious compartment");
        let infectious = runtime.table.column(infectious_idx);
        let i0 = infectious[0];
        let area = cumtrapz(
            infectious.view(),
            ndarray::ArrayView1::from(runtime.table.times()),
            i0,
        );
        Ok(area * gamma)
    }

    /// Force of infection per susceptible: `beta · I / N`, with the
    /// asymptomatic contribution `rho · A` added for SEAIR.
    fn force_column(&self, runtime: &Runtime) -> EpiResult<Array1<f64>> {
        let beta = self.params.get(ParamId::Derived(DerivedParam::Beta))?;
        let n = runtime.table.row_sums();
        let infectious_idx = self
            .family
            .compartment_index("infectious")
            .expect("every family has an infectious compartment");
        let infectious = runtime.table.column(infectious_idx);
        let pressure = match self.family {
            ModelFamily::Sir | ModelFamily::Seir => infectious,
            ModelFamily::Seair => {
                let rho = self.params.get(ParamId::Primary(PrimaryParam::Rho))?;
                let asymptomatic = runtime.table.column(2);
                infectious + asymptomatic * rho
            }
        };
        Ok(pressure * beta / n)
    }

    // ---- Helper methods ----

    fn build_rates(&self) -> EpiResult<RateSet> {
        let constant = |id: ParamId| -> EpiResult<Rate> {
            Ok(Rate::Constant(self.params.get(id)?))
        };
        Ok(RateSet {
            r0: match &self.overrides.r0 {
                Some(r) => r.clone(),
                None => constant(ParamId::Primary(PrimaryParam::R0))?,
            },
            gamma: match &self.overrides.gamma {
                Some(r) => r.clone(),
                None => constant(ParamId::Derived(DerivedParam::Gamma))?,
            },
            sigma: match &self.overrides.sigma {
                Some(r) => r.clone(),
                None => constant(ParamId::Derived(DerivedParam::Sigma))?,
            },
            rho: match &self.overrides.rho {
                Some(r) => r.clone(),
                None => constant(ParamId::Primary(PrimaryParam::Rho))?,
            },
            prob_symptoms: match &self.overrides.prob_symptoms {
                Some(r) => r.clone(),
                None => constant(ParamId::Primary(PrimaryParam::ProbSymptoms))?,
            },
        })
    }
}
