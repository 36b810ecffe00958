//! Closed-form fill for the linearized SIR model (`eSIR`).
//!
//! The linearized model freezes the susceptible fraction `e = S0/N` at its
//! value when the run starts, so within one run the infectious compartment
//! follows `I(t) = I0 · e^{Ke t}` exactly, with effective growth rate
//! `Ke = gamma · (e · R0 − 1)`. Recovered mass is the analytic integral of
//! the removals; susceptibles absorb `R0 · e` times that integral and are
//! clamped into the physical range.
//!
//! Near `Ke = 0` the integral `(e^{Ke t} − 1)/Ke` cancels; a short series
//! expansion takes over below `|Ke| = 1e-6`.
//!
//! Running in several shorter chunks re-freezes `e` at each chunk boundary,
//! which is the intended way to approximate saturation with this model.

use ndarray::{array, Array1, ArrayView1};

/// Threshold below which the exponential integral switches to its series
/// expansion.
const KE_SERIES_THRESHOLD: f64 = 1e-6;

/// Rows of the linearized-SIR solution at the relative times `ts_rel`
/// (measured from the start of this run), from the state `x0 = [S, I, R]`.
pub(crate) fn fill_linearized_sir(
    r0: f64,
    gamma: f64,
    x0: ArrayView1<f64>,
    ts_rel: &[f64],
) -> Vec<Array1<f64>> {
    let (s0, i0, rec0) = (x0[0], x0[1], x0[2]);
    let n = s0 + i0 + rec0;
    let e = (s0 / n).max(0.0);
    let ke = gamma * (e * r0 - 1.0);

    ts_rel
        .iter()
        .map(|&t| {
            let i = i0 * (ke * t).exp();
            let factor = if ke.abs() < KE_SERIES_THRESHOLD {
                let x = ke * t;
                i0 * gamma * t * (1.0 + x / 2.0 + x * x / 2.0)
            } else {
                (gamma / ke) * (i - i0).max(0.0)
            };
            let rec = (rec0 + factor).min(n);
            let s = (s0 - r0 * e * factor).max(0.0);
            array![s, i, rec]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // The closed-form fill itself: exact exponential growth of I, the series
    // branch at Ke ~ 0, and the clamping of S and R. Model-level behavior
    // (table integration, chunked runs) is tested at the model layer.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // With a negligible infectious seed (e ~ 1) the infectious curve is
    // exactly I0 * exp(K t) with K = gamma (R0 - 1).
    fn infectious_grows_exponentially() {
        let (r0, gamma) = (2.0, 0.25);
        let x0 = array![1e9 - 1.0, 1.0, 0.0];
        let ts: Vec<f64> = (1..=30).map(f64::from).collect();

        let rows = fill_linearized_sir(r0, gamma, x0.view(), &ts);

        let e = (1e9 - 1.0) / 1e9;
        let ke = gamma * (e * r0 - 1.0);
        for (row, &t) in rows.iter().zip(&ts) {
            assert_relative_eq!(row[1], (ke * t).exp(), max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // At the threshold Ke ~ 0 (R0 = 1, negligible seed) the series branch
    // keeps recoveries growing linearly, no 0/0.
    fn series_branch_handles_zero_growth() {
        let (r0, gamma) = (1.0, 0.25);
        let x0 = array![1e9 - 1.0, 1.0, 0.0];

        let rows = fill_linearized_sir(r0, gamma, x0.view(), &[1.0, 2.0]);

        // Removals at rate gamma * I0 per day, I held flat.
        assert_relative_eq!(rows[0][1], 1.0, max_relative = 1e-6);
        assert_relative_eq!(rows[0][2], gamma, max_relative = 1e-6);
        assert_relative_eq!(rows[1][2], 2.0 * gamma, max_relative = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // S never drops below zero and R never exceeds the population, even when
    // the linearized growth runs far past saturation.
    fn clamps_keep_the_state_physical() {
        let (r0, gamma) = (3.0, 0.5);
        let x0 = array![1000.0, 10.0, 0.0];

        let rows = fill_linearized_sir(r0, gamma, x0.view(), &[100.0]);

        assert!(rows[0][0] >= 0.0);
        assert!(rows[0][2] <= 1010.0);
    }
}
