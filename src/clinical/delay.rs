//! Delay transforms: time-shifted views of epidemic curves.
//!
//! Clinical progression is modeled as populations entering a state some days
//! after an upstream event (symptom onset to hospitalization, hospitalization
//! to death) and possibly leaving it again after a dwell period. Both are
//! expressed as interpolated reads of the upstream curve at shifted times:
//!
//! - [`delayed`] reads the curve at `t − delay` (linear interpolation on the
//!   simulation grid);
//! - [`delayed_with_discharge`] is `entry − discharge`, where the entry curve
//!   is delayed by `d1` and the discharge curve by a further `d2`.
//!
//! ## Edge handling
//! Query times before the first observation are extrapolated backward
//! assuming exponential growth at the caller-supplied rate `k`:
//! `x(t) = x(t0) · e^{k (t − t0)}` for `t < t0`. Without this, delayed
//! quantities near the start of a simulation would be spuriously zero (or
//! frozen at the initial value) for the first `delay` days. Callers obtain
//! `k` from the infection model's growth factor; `k = 0` degrades to the
//! flat-clamp behavior.
//!
//! ## Identity
//! A zero delay is an exact no-op: `delayed(x, 0, k) == x` bitwise. The
//! shifted grid coincides with the original one, interpolation reproduces
//! ordinates exactly, and no extrapolation is triggered.

use ndarray::{Array1, ArrayView1};

use crate::utils::interp;

/// The curve `values` over `times`, shifted so the value at `t` is the
/// upstream value at `t − delay`.
///
/// Negative delays shift the curve the other way (values from `t + |delay|`),
/// clamped at the final observation.
pub fn delayed(times: &[f64], values: ArrayView1<f64>, delay: f64, k: f64) -> Array1<f64> {
    if delay == 0.0 {
        return values.to_owned();
    }
    let t0 = times[0];
    let times_view = ArrayView1::from(times);
    let query: Array1<f64> = times.iter().map(|&t| t - delay).collect();
    let mut out = interp(query.view(), times_view, values);

    // Backward exponential extrapolation for reads before the first
    // observation.
    for (o, &tq) in out.iter_mut().zip(query.iter()) {
        if tq < t0 {
            *o = values[0] * (k * (tq - t0)).exp();
        }
    }
    out
}

/// Population currently in a delayed state with a finite dwell time:
/// `entry − discharge`, where entry lags the upstream curve by `d1` and
/// discharge lags entry by a further `d2`.
///
/// With `positive`, the difference is floored at zero — the physical reading
/// for a population count. For nondecreasing upstream curves (cumulative
/// counts) the floor never binds.
pub fn delayed_with_discharge(
    times: &[f64],
    values: ArrayView1<f64>,
    d1: f64,
    d2: f64,
    k: f64,
    positive: bool,
) -> Array1<f64> {
    let entry = delayed(times, values, d1, k);
    let discharge = delayed(times, entry.view(), d2, k);
    let diff = entry - discharge;
    if positive {
        diff.mapv(|v| v.max(0.0))
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The exact zero-delay identity.
    // - Grid-aligned shifting for integer delays.
    // - Exponential backward extrapolation before the first observation.
    // - Entry-minus-discharge composition and the positive floor.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // delay = 0 returns the input bitwise (the identity the clinical layer
    // depends on).
    fn zero_delay_is_the_exact_identity() {
        let times = [0.0, 1.0, 2.0, 3.0];
        let values = array![0.3, 1.7, 2.9, 4.1];

        let out = delayed(&times, values.view(), 0.0, 0.37);

        assert_eq!(out, values);
    }

    #[test]
    // Purpose
    // -------
    // An integer delay on the unit grid shifts values right by that many
    // rows (within the valid range).
    fn integer_delay_shifts_on_the_grid() {
        let times = [0.0, 1.0, 2.0, 3.0, 4.0];
        let values = array![1.0, 2.0, 4.0, 8.0, 16.0];

        let out = delayed(&times, values.view(), 2.0, 0.0);

        assert_eq!(out[2], 1.0);
        assert_eq!(out[3], 2.0);
        assert_eq!(out[4], 4.0);
    }

    #[test]
    // Purpose
    // -------
    // Before the first observation the curve is extrapolated backward as
    // x0 * exp(k (t - t0)), not clamped flat.
    fn early_reads_extrapolate_exponentially() {
        let times = [0.0, 1.0, 2.0];
        let k: f64 = 0.5;
        // Curve consistent with exp growth at rate k from 1.0.
        let values = array![1.0, k.exp(), (2.0 * k).exp()];

        let out = delayed(&times, values.view(), 1.0, k);

        // At t = 0 the read is at t = -1, one growth period before x0.
        assert_relative_eq!(out[0], (-k).exp(), max_relative = 1e-12);
        // And the whole delayed curve is the original shifted by one period.
        assert_relative_eq!(out[1], 1.0, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Entry-minus-discharge of a cumulative curve counts the population
    // between the two delays and never goes negative with the floor.
    fn discharge_composition_counts_the_population_in_state() {
        let times: Vec<f64> = (0..10).map(f64::from).collect();
        // Cumulative admissions: 1 per day.
        let values: Array1<f64> = times.iter().map(|&t| t).collect();

        let out = delayed_with_discharge(&times, values.view(), 0.0, 3.0, 0.0, true);

        // Steady state: exactly the last 3 days of admissions are in-state.
        assert_relative_eq!(out[9], 3.0, max_relative = 1e-12);
        assert!(out.iter().all(|&v| v >= 0.0));
    }
}
