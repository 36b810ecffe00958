//! core — shared building blocks for compartmental simulation.
//!
//! Purpose
//! -------
//! Collect the pieces the model layer is assembled from: the parameter
//! namespace ([`params`]), the per-family formula registry ([`formulas`]),
//! the fixed-step ODE integrator ([`solver`]), the append-only simulation
//! table ([`table`]), and the column-query mini-language ([`query`]).
//!
//! Key behaviors
//! -------------
//! - [`params`] resolves primary and derived parameters (with alias
//!   normalization, inverse back-solving, and metadata preservation).
//! - [`formulas`] holds the per-family math — growth rates, transmission
//!   rates, and exponential-regime seed estimators — plus the
//!   [`ModelFamily`](formulas::ModelFamily) dispatch enum.
//! - [`solver`] advances state vectors by RK4 (or Euler) with substeps,
//!   sampling time-dependent rates at the stage times.
//! - [`table`] records one row per step under a strictly increasing time
//!   index; [`query`] turns `"column:transform"` strings and row restrictions
//!   into structured requests dispatched through explicit matches.
//!
//! Downstream usage
//! ----------------
//! - The model layer (`compartmental::models`) composes these into the
//!   user-facing [`EpiModel`](crate::compartmental::models::EpiModel).
//! - The clinical overlays reuse [`table::TimeSeries`] and [`query`] so both
//!   layers answer queries through one contract.

pub mod formulas;
pub mod params;
pub mod query;
pub mod solver;
pub mod table;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::formulas::ModelFamily;
pub use self::params::{DerivedParam, Param, ParamId, ParamPdf, ParamSet, PrimaryParam, MIN_PERIOD};
pub use self::query::{ColumnQuery, ColumnValue, QueryContext, QueryIndex, Transform};
pub use self::solver::{Method, OdeOptions, Rate, RateSet, RateValues};
pub use self::table::{TimeIndex, TimeSeries, TimeSeriesTable};
