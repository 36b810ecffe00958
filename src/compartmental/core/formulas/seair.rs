//! SEAIR formulas: symptomatic/asymptomatic split on top of the SEIR
//! skeleton.
//!
//! SEAIR divides outgoing incubations between a symptomatic infectious
//! compartment (probability `Qs = prob_symptoms`) and an asymptomatic one
//! that transmits at the relative rate `rho`. `R0` therefore weighs the
//! transmission rate by the effective infectivity `Qs + (1 − Qs) · rho`,
//! while the linearized growth pair (`K`, `R0`) is shared with SEIR.

use ndarray::{array, Array1};

use super::require_supercritical;
use crate::compartmental::errors::ParamResult;

pub use super::seir::{infectious_from_cases, k, r0_from_k, time_to_seed};

/// `R0 = beta / gamma · (Qs + (1 − Qs) · rho)`.
pub fn r0(beta: f64, gamma: f64, prob_symptoms: f64, rho: f64) -> f64 {
    let qs = prob_symptoms;
    beta / gamma * (qs + (1.0 - qs) * rho)
}

/// `beta = R0 · gamma / (Qs + (1 − Qs) · rho)`; inverse of [`r0`].
pub fn beta(r0: f64, gamma: f64, prob_symptoms: f64, rho: f64) -> f64 {
    let qs = prob_symptoms;
    r0 * gamma / (qs + (1.0 - qs) * rho)
}

/// Exposed population in the exponential regime:
/// `E = I · (gamma + K) / (sigma · Qs)`.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn exposed_from_cases(
    cases: f64,
    r0: f64,
    gamma: f64,
    sigma: f64,
    prob_symptoms: f64,
) -> ParamResult<f64> {
    require_supercritical(r0)?;
    let k_val = k(r0, gamma, sigma);
    let i0 = infectious_from_cases(cases, r0, gamma, sigma)?;
    Ok(i0 * (gamma + k_val) / (sigma * prob_symptoms))
}

/// Asymptomatic population in the exponential regime:
/// `A = I · (1 − Qs) / Qs`.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn asymptomatic_from_cases(
    cases: f64,
    r0: f64,
    gamma: f64,
    sigma: f64,
    prob_symptoms: f64,
) -> ParamResult<f64> {
    require_supercritical(r0)?;
    let i0 = infectious_from_cases(cases, r0, gamma, sigma)?;
    Ok(i0 * (1.0 - prob_symptoms) / prob_symptoms)
}

/// Back-calculated `[S, E, A, I, R]` state from population and cumulative
/// cases.
///
/// Cumulative cases count *symptomatic* infections, so the recovered pool is
/// scaled up by `1 / Qs` to account for unobserved asymptomatic recoveries;
/// susceptibles absorb the remainder so the state sums exactly to
/// `population`.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn state_from_cases(
    population: f64,
    cases: f64,
    r0: f64,
    gamma: f64,
    sigma: f64,
    prob_symptoms: f64,
) -> ParamResult<Array1<f64>> {
    let i = infectious_from_cases(cases, r0, gamma, sigma)?;
    let e = exposed_from_cases(cases, r0, gamma, sigma, prob_symptoms)?;
    let a = asymptomatic_from_cases(cases, r0, gamma, sigma, prob_symptoms)?;
    let r = (cases - i) / prob_symptoms;
    let s = population - e - a - i - r;
    Ok(array![s, e, a, i, r])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Pure-function numerics for the symptomatic split: the weighted R0/beta
    // pair, the degenerate Qs = 1 case collapsing onto SEIR, and seed-state
    // consistency.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // With Qs = 1 (everyone symptomatic) the weighting disappears and the
    // pair matches the SEIR relations regardless of rho.
    fn qs_one_collapses_to_seir() {
        assert_relative_eq!(r0(1.0, 0.5, 1.0, 0.55), super::super::sir::r0(1.0, 0.5));
        assert_relative_eq!(beta(2.0, 0.5, 1.0, 0.0), super::super::sir::beta(2.0, 0.5));
    }

    #[test]
    // Purpose
    // -------
    // beta and r0 are mutually inverse for a non-trivial split.
    fn beta_and_r0_are_mutually_inverse() {
        let (gamma, qs, rho) = (0.3, 0.14, 0.55);

        let beta_val = beta(2.74, gamma, qs, rho);

        assert_relative_eq!(r0(beta_val, gamma, qs, rho), 2.74, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The seeded state sums exactly to the population, and the asymptomatic
    // pool carries the (1 - Qs)/Qs share of the infectious one.
    fn state_from_cases_is_self_consistent() {
        let (r0_val, gamma, sigma, qs) = (2.74, 1.0 / 3.47, 1.0 / 3.69, 0.14);

        let state = state_from_cases(1e7, 5000.0, r0_val, gamma, sigma, qs).unwrap();

        assert_relative_eq!(state.sum(), 1e7, max_relative = 1e-12);
        assert_relative_eq!(
            state[2],
            state[3] * (1.0 - qs) / qs,
            max_relative = 1e-12
        );
        assert!(state.iter().all(|&x| x >= 0.0));
    }
}
