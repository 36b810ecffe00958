//! SIR formulas: growth rate, transmission rate, and exponential seeds.
//!
//! Model convention: `S → I` at rate `beta · S · I / N`, `I → R` at rate
//! `gamma · I`. The early epidemic grows like `I(t) = I0 · e^{K t}` with
//! `K = gamma · (R0 − 1)` — linear in `R0`, so the inverse is exact.
//!
//! The seed estimators assume perfect exponential growth from a single
//! seeded case; they are only defined for `R0 > 1`.

use ndarray::{array, Array1};

use super::require_supercritical;
use crate::compartmental::errors::ParamResult;

/// Number of index cases behind the seed estimators.
const SEED: f64 = 1.0;

/// `R0 = beta / gamma`.
pub fn r0(beta: f64, gamma: f64) -> f64 {
    beta / gamma
}

/// `beta = R0 · gamma`; inverse of [`r0`].
pub fn beta(r0: f64, gamma: f64) -> f64 {
    r0 * gamma
}

/// Exponential growth factor `K = gamma · (R0 − 1)`.
///
/// Zero at `R0 = 1`, negative for a decaying epidemic.
pub fn k(r0: f64, gamma: f64) -> f64 {
    gamma * (r0 - 1.0)
}

/// `R0 = 1 + K / gamma`; inverse of [`k`].
pub fn r0_from_k(k: f64, gamma: f64) -> f64 {
    1.0 + k / gamma
}

/// Infectious population implied by a cumulative case count under exponential
/// growth: `I = (cases · (R0 − 1) + seed) / (2 R0 − 1)`.
///
/// # Errors
/// Rejects `R0 <= 1`; the growth regime does not exist.
pub fn infectious_from_cases(cases: f64, r0: f64) -> ParamResult<f64> {
    require_supercritical(r0)?;
    Ok((cases * (r0 - 1.0) + SEED) / (2.0 * r0 - 1.0))
}

/// Back-calculated `[S, I, R]` state from population and cumulative cases.
///
/// Splits `cases` into currently infectious and already recovered by the
/// exponential-regime ratio; susceptibles absorb the remainder so the state
/// sums exactly to `population`.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn state_from_cases(population: f64, cases: f64, r0: f64) -> ParamResult<Array1<f64>> {
    let i = infectious_from_cases(cases, r0)?;
    let r = cases - i;
    let s = population - i - r;
    Ok(array![s, i, r])
}

/// Exponential extrapolation of the time from one seeded case to `cases`
/// cumulative cases.
///
/// # Errors
/// Rejects `R0 <= 1`.
pub fn time_to_seed(cases: f64, r0: f64, gamma: f64) -> ParamResult<f64> {
    require_supercritical(r0)?;
    Ok(((cases * (r0 - 1.0) + SEED) / (2.0 * r0 - 1.0)).ln() / (r0 - 1.0) / gamma)
}
