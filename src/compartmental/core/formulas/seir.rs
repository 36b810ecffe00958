//! SEIR formulas: growth rate, its closed-form inverse, and exponential
//! seeds.
//!
//! The SEIR growth rate is the positive root of a quadratic in `K`:
//! `(K + sigma)(K + gamma) = R0 · sigma · gamma`. It is evaluated here in the
//! completed-square form
//!
//! `K = 0.5 · (sigma + gamma) · (√(1 + 4 (R0 − 1) σ γ / (σ + γ)²) − 1)`
//!
//! which stays accurate near `R0 ≈ 1` (the radicand tends to 1 and the
//! subtraction is benign, unlike the expanded quadratic formula). Keep this
//! form; reformulations cancel catastrophically exactly where fitted models
//! operate.
//!
//! `R0` and `beta` relate as in SIR; the exposed/infectious seed ratios come
//! from the linearized dynamics in the exponential regime.

use ndarray::{array, Array1};

use super::require_supercritical;
use crate::compartmental::errors::ParamResult;

/// Number of index cases behind the seed estimators.
const SEED: f64 = 1.0;

pub use super::sir::{beta, r0};

/// Exponential growth factor for the SEIR family.
///
/// Exact algebraic form; see the module docs for why the shape matters.
/// `K(R0=1) == 0` exactly for any positive rates.
pub fn k(r0: f64, gamma: f64, sigma: f64) -> f64 {
    let mu = sigma + gamma;
    0.5 * mu * ((1.0 + 4.0 * (r0 - 1.0) * sigma * gamma / (mu * mu)).sqrt() - 1.0)
}

/// Closed-form inverse of [`k`]:
/// `R0 = 1 + (gamma + sigma + K) · K / (gamma · sigma)`.
pub fn r0_from_k(k: f64, gamma: f64, sigma: f64) -> f64 {
    1.0 + (gamma + sigma + k) * k / (gamma * sigma)
}

/// Infectious population implied by a cumulative case count under exponential
/// growth: `I = ((cases − seed) · K + beta · seed) / beta`.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn infectious_from_cases(cases: f64, r0: f64, gamma: f64, sigma: f64) -> ParamResult<f64> {
    require_supercritical(r0)?;
    let k_val = k(r0, gamma, sigma);
    let beta_val = gamma * r0;
    Ok(((cases - SEED) * k_val + beta_val * SEED) / beta_val)
}

/// Exposed population in the exponential regime:
/// `E = I · (gamma · R0) / (K + sigma)`.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn exposed_from_cases(cases: f64, r0: f64, gamma: f64, sigma: f64) -> ParamResult<f64> {
    require_supercritical(r0)?;
    let k_val = k(r0, gamma, sigma);
    let i0 = infectious_from_cases(cases, r0, gamma, sigma)?;
    Ok(i0 * (gamma * r0) / (k_val + sigma))
}

/// Back-calculated `[S, E, I, R]` state from population and cumulative cases.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn state_from_cases(
    population: f64,
    cases: f64,
    r0: f64,
    gamma: f64,
    sigma: f64,
) -> ParamResult<Array1<f64>> {
    let i = infectious_from_cases(cases, r0, gamma, sigma)?;
    let e = exposed_from_cases(cases, r0, gamma, sigma)?;
    let r = cases - i;
    let s = population - i - e - r;
    Ok(array![s, e, i, r])
}

/// Exponential extrapolation of the time from one seeded case to `cases`
/// cumulative cases.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn time_to_seed(cases: f64, r0: f64, gamma: f64, sigma: f64) -> ParamResult<f64> {
    require_supercritical(r0)?;
    let k_val = k(r0, gamma, sigma);
    let beta_val = gamma * r0;
    let cases_per_seed = (cases - SEED) / SEED;
    Ok(((cases_per_seed * k_val + beta_val) / beta_val).ln() / k_val)
}
