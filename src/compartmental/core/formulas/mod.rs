//! Epidemiological formulas per compartmental family.
//!
//! Purpose
//! -------
//! Relate the headline epidemiological quantities — `R0`, the transmission
//! rate `beta`, and the early-epidemic exponential growth rate `K` — and
//! back-calculate self-consistent initial states from a cumulative case count,
//! per model family. Two layers are provided:
//!
//! - Pure functions in [`sir`], [`seir`], and [`seair`] taking explicit `f64`
//!   arguments. These are the mathematical ground truth and carry the
//!   family-specific algebra.
//! - [`ModelFamily`], an enum that dispatches to the right pure function and
//!   resolves missing arguments from a
//!   [`ParamSet`](crate::compartmental::core::params::ParamSet). Explicit
//!   arguments always win; everything else is looked up (alias-normalized)
//!   in the parameter set, surfacing
//!   [`ParamError::MissingParameter`](crate::compartmental::errors::ParamError)
//!   when unresolvable.
//!
//! Numerics
//! --------
//! - `K` for the SEIR family is evaluated in the exact algebraic form
//!   `0.5·(σ+γ)·(√(1 + 4(R0−1)σγ/(σ+γ)²) − 1)`, which is stable near
//!   `R0 ≈ 1` where the naive expansion cancels catastrophically. `K(R0=1)`
//!   is exactly zero for every family.
//! - The exponential-seed estimators (`infectious_from_cases` and friends)
//!   have no meaning for a non-growing epidemic and reject `R0 <= 1` with
//!   [`ParamError::InvalidParameter`]; the value is never clamped.
//! - The SEAIR family shares the SEIR `K`/`R0` growth pair (the asymptomatic
//!   split does not change the linearized growth rate under the unit-rho
//!   parameterization used here).

pub mod seair;
pub mod seir;
pub mod sir;

use ndarray::Array1;

use crate::compartmental::core::params::{DerivedParam, ParamId, ParamSet, PrimaryParam};
use crate::compartmental::errors::ParamResult;

/// Compartmental model family: fixes the state layout, the active parameter
/// set, and which formula variants apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Susceptible / Infectious / Recovered.
    Sir,
    /// Susceptible / Exposed / Infectious / Recovered.
    Seir,
    /// Susceptible / Exposed / Asymptomatic / Infectious / Recovered.
    Seair,
}

impl ModelFamily {
    /// Family name as used in error messages and summaries.
    pub const fn name(self) -> &'static str {
        match self {
            ModelFamily::Sir => "SIR",
            ModelFamily::Seir => "SEIR",
            ModelFamily::Seair => "SEAIR",
        }
    }

    /// Compartment names in state-vector order.
    pub const fn compartments(self) -> &'static [&'static str] {
        match self {
            ModelFamily::Sir => &["susceptible", "infectious", "recovered"],
            ModelFamily::Seir => &["susceptible", "exposed", "infectious", "recovered"],
            ModelFamily::Seair => {
                &["susceptible", "exposed", "asymptomatic", "infectious", "recovered"]
            }
        }
    }

    /// Number of compartments in the state vector.
    pub const fn n_compartments(self) -> usize {
        self.compartments().len()
    }

    /// Index of a compartment by canonical name or single-letter alias.
    ///
    /// `"E"`/`"exposed"` on SIR aliases the infectious compartment, keeping
    /// the SIR model usable as the zero-incubation limit of SEIR in
    /// column-query code.
    pub fn compartment_index(self, name: &str) -> Option<usize> {
        let canonical = match name {
            "S" => "susceptible",
            "E" => "exposed",
            "A" => "asymptomatic",
            "I" => "infectious",
            "R" => "recovered",
            other => other,
        };
        if self == ModelFamily::Sir && canonical == "exposed" {
            return Some(1);
        }
        self.compartments().iter().position(|&c| c == canonical)
    }

    /// Primaries the family exposes as settable.
    pub const fn active_primaries(self) -> &'static [PrimaryParam] {
        match self {
            ModelFamily::Sir => &[PrimaryParam::R0, PrimaryParam::InfectiousPeriod],
            ModelFamily::Seir => &[
                PrimaryParam::R0,
                PrimaryParam::InfectiousPeriod,
                PrimaryParam::IncubationPeriod,
            ],
            ModelFamily::Seair => &[
                PrimaryParam::R0,
                PrimaryParam::InfectiousPeriod,
                PrimaryParam::IncubationPeriod,
                PrimaryParam::Rho,
                PrimaryParam::ProbSymptoms,
            ],
        }
    }

    /// Default values for the active primaries.
    ///
    /// The SIR default folds the incubation period into the infectious
    /// period, so the SIR and SEIR defaults describe the same disease at
    /// matching overall generation time.
    pub fn default_primaries(self) -> Vec<(PrimaryParam, f64)> {
        match self {
            ModelFamily::Sir => vec![
                (PrimaryParam::R0, 2.74),
                (PrimaryParam::InfectiousPeriod, 3.69 + 3.47),
            ],
            ModelFamily::Seir => vec![
                (PrimaryParam::R0, 2.74),
                (PrimaryParam::InfectiousPeriod, 3.47),
                (PrimaryParam::IncubationPeriod, 3.69),
            ],
            ModelFamily::Seair => vec![
                (PrimaryParam::R0, 2.74),
                (PrimaryParam::InfectiousPeriod, 3.47),
                (PrimaryParam::IncubationPeriod, 3.69),
                (PrimaryParam::Rho, 0.55),
                (PrimaryParam::ProbSymptoms, 0.14),
            ],
        }
    }

    /// Fixed value behind a primary the family does not expose.
    pub const fn fixed_primary(self, p: PrimaryParam) -> f64 {
        match p {
            PrimaryParam::IncubationPeriod => 0.0,
            PrimaryParam::Rho => 1.0,
            PrimaryParam::ProbSymptoms => 1.0,
            // R0 and infectious_period are active on every family; this arm
            // is unreachable through ParamSet but keeps the match total.
            PrimaryParam::R0 => 1.0,
            PrimaryParam::InfectiousPeriod => 1.0,
        }
    }

    // ---- Formula dispatch (parameter-set resolution) ----

    /// `R0` from the stored transmission and removal rates.
    pub fn r0(self, params: &ParamSet) -> ParamResult<f64> {
        let beta = params.get(ParamId::Derived(DerivedParam::Beta))?;
        self.r0_from_beta(beta, params)
    }

    /// Transmission rate `beta` from `R0` and the removal rate.
    pub fn beta(self, params: &ParamSet) -> ParamResult<f64> {
        let r0 = params.get(ParamId::Primary(PrimaryParam::R0))?;
        let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
        Ok(match self {
            ModelFamily::Sir | ModelFamily::Seir => sir::beta(r0, gamma),
            ModelFamily::Seair => {
                let qs = params.get(ParamId::Primary(PrimaryParam::ProbSymptoms))?;
                let rho = params.get(ParamId::Primary(PrimaryParam::Rho))?;
                seair::beta(r0, gamma, qs, rho)
            }
        })
    }

    /// Inverse of [`beta`](Self::beta): back out `R0` from a transmission
    /// rate.
    pub fn r0_from_beta(self, beta: f64, params: &ParamSet) -> ParamResult<f64> {
        let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
        Ok(match self {
            ModelFamily::Sir | ModelFamily::Seir => sir::r0(beta, gamma),
            ModelFamily::Seair => {
                let qs = params.get(ParamId::Primary(PrimaryParam::ProbSymptoms))?;
                let rho = params.get(ParamId::Primary(PrimaryParam::Rho))?;
                seair::r0(beta, gamma, qs, rho)
            }
        })
    }

    /// Early-epidemic exponential growth rate `K`.
    pub fn k(self, params: &ParamSet) -> ParamResult<f64> {
        let r0 = params.get(ParamId::Primary(PrimaryParam::R0))?;
        let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
        Ok(match self {
            ModelFamily::Sir => sir::k(r0, gamma),
            ModelFamily::Seir | ModelFamily::Seair => {
                let sigma = params.get(ParamId::Derived(DerivedParam::Sigma))?;
                seir::k(r0, gamma, sigma)
            }
        })
    }

    /// Inverse of [`k`](Self::k): closed-form `R0` from a growth rate.
    pub fn r0_from_k(self, k: f64, params: &ParamSet) -> ParamResult<f64> {
        let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
        Ok(match self {
            ModelFamily::Sir => sir::r0_from_k(k, gamma),
            ModelFamily::Seir | ModelFamily::Seair => {
                let sigma = params.get(ParamId::Derived(DerivedParam::Sigma))?;
                seir::r0_from_k(k, gamma, sigma)
            }
        })
    }

    /// Infectious compartment implied by a cumulative case count in the
    /// exponential-growth regime.
    ///
    /// # Errors
    /// [`ParamError::InvalidParameter`](crate::compartmental::errors::ParamError)
    /// when `R0 <= 1`.
    pub fn infectious_from_cases(self, cases: f64, params: &ParamSet) -> ParamResult<f64> {
        let r0 = params.get(ParamId::Primary(PrimaryParam::R0))?;
        match self {
            ModelFamily::Sir => sir::infectious_from_cases(cases, r0),
            ModelFamily::Seir | ModelFamily::Seair => {
                let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
                let sigma = params.get(ParamId::Derived(DerivedParam::Sigma))?;
                seir::infectious_from_cases(cases, r0, gamma, sigma)
            }
        }
    }

    /// Full state vector implied by a cumulative case count and a population,
    /// assuming the exponential-growth regime.
    ///
    /// # Errors
    /// [`ParamError::InvalidParameter`](crate::compartmental::errors::ParamError)
    /// when `R0 <= 1`.
    pub fn state_from_cases(
        self,
        population: f64,
        cases: f64,
        params: &ParamSet,
    ) -> ParamResult<Array1<f64>> {
        let r0 = params.get(ParamId::Primary(PrimaryParam::R0))?;
        match self {
            ModelFamily::Sir => sir::state_from_cases(population, cases, r0),
            ModelFamily::Seir => {
                let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
                let sigma = params.get(ParamId::Derived(DerivedParam::Sigma))?;
                seir::state_from_cases(population, cases, r0, gamma, sigma)
            }
            ModelFamily::Seair => {
                let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
                let sigma = params.get(ParamId::Derived(DerivedParam::Sigma))?;
                let qs = params.get(ParamId::Primary(PrimaryParam::ProbSymptoms))?;
                seair::state_from_cases(population, cases, r0, gamma, sigma, qs)
            }
        }
    }

    /// Exponential-extrapolation estimate of the time from a single seed to
    /// the given cumulative case count.
    ///
    /// # Errors
    /// [`ParamError::InvalidParameter`](crate::compartmental::errors::ParamError)
    /// when `R0 <= 1`.
    pub fn time_to_seed(self, cases: f64, params: &ParamSet) -> ParamResult<f64> {
        let r0 = params.get(ParamId::Primary(PrimaryParam::R0))?;
        let gamma = params.get(ParamId::Derived(DerivedParam::Gamma))?;
        match self {
            ModelFamily::Sir => sir::time_to_seed(cases, r0, gamma),
            ModelFamily::Seir | ModelFamily::Seair => {
                let sigma = params.get(ParamId::Derived(DerivedParam::Sigma))?;
                seir::time_to_seed(cases, r0, gamma, sigma)
            }
        }
    }
}

/// Guard shared by the exponential-seed estimators.
pub(crate) fn require_supercritical(r0: f64) -> ParamResult<()> {
    if r0 <= 1.0 {
        return Err(crate::compartmental::errors::ParamError::InvalidParameter {
            name: "R0",
            value: r0,
            reason: "must be greater than one",
        });
    }
    Ok(())
}
