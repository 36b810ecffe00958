//! models — user-facing compartmental models.
//!
//! [`EpiModel`] is the single model type; the family enum fixes the
//! compartment layout and formulas, and the dynamics variant picks between
//! numerical ODE integration and the closed-form linearized SIR. Construct
//! via the family constructors ([`EpiModel::sir`], [`EpiModel::seir`],
//! [`EpiModel::seair`], [`EpiModel::esir`]) and the builder-style
//! configuration methods.

pub mod analytic;
pub mod model;

pub use self::model::{Dynamics, EpiModel, InitialCondition};
