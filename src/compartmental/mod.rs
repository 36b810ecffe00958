//! compartmental — the infection-model stack: parameters, formulas, solver,
//! table, queries, and the model type.
//!
//! Purpose
//! -------
//! Provide a cohesive compartmental-epidemic layer: validated parameter
//! namespaces with derived/back-solvable parameters, per-family formula
//! registries, fixed-step ODE integration with time-dependent rates, an
//! append-only simulation table, and a string-keyed column-query interface.
//! This is the surface most consumers (including the clinical overlays and
//! the Python bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect the numerical and structural building blocks in [`core`]:
//!   parameter sets, model families and their formulas, the RK4/Euler
//!   integrator, the time-series table, and query parsing/dispatch.
//! - Expose the user-facing model API in [`models`] via
//!   [`EpiModel`](models::EpiModel): construction per family, builder-style
//!   configuration, explicit initialization, the run loop, and column
//!   queries.
//! - Centralize error types in [`errors`] (`ParamError`, `EpiError`, and the
//!   `ParamResult`/`EpiResult` aliases) so callers see one uniform error
//!   surface.
//!
//! Invariants & assumptions
//! ------------------------
//! - Simulation tables are append-only with strictly increasing time
//!   indices; one row per outer integration step plus the initial row.
//! - Parameter sets are family-bound: which primaries are settable depends
//!   on the model family, and aliases resolve to a single storage slot.
//! - The stack performs no I/O; logging goes through the `log` facade at
//!   debug level on lifecycle boundaries. Panics indicate programming errors
//!   (table misuse), never user-reachable conditions.
//!
//! Downstream usage
//! ----------------
//! - Typical flow: pick a family constructor, configure population/region/
//!   disease/dates, optionally set parameters or time-varying overrides,
//!   `run(days)`, then read columns with `model.get("cases:p100k")` and
//!   friends.
//! - Clinical progression overlays (`crate::clinical`) borrow a finished
//!   model immutably and answer the same query language over derived
//!   hospitalization/death curves.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    ColumnQuery, ColumnValue, DerivedParam, Method, ModelFamily, OdeOptions, Param, ParamId,
    ParamPdf, ParamSet, PrimaryParam, QueryContext, QueryIndex, Rate, RateSet, TimeIndex,
    TimeSeries, TimeSeriesTable, Transform,
};
pub use self::errors::{EpiError, EpiResult, ParamError, ParamResult};
pub use self::models::{Dynamics, EpiModel, InitialCondition};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use epidemics::compartmental::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::{
        ColumnValue, EpiError, EpiModel, EpiResult, ModelFamily, OdeOptions, ParamId, ParamSet,
        QueryIndex, TimeSeries,
    };
}
