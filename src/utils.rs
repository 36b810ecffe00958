//! Shared numerical helpers for the simulation and clinical stacks.
//!
//! Purpose
//! -------
//! Provide the two array kernels everything else leans on: piecewise-linear
//! interpolation over a monotonic grid ([`interp`]) and cumulative trapezoidal
//! integration ([`cumtrapz`]). Both operate on `ndarray` views, allocate only
//! their output, and are deliberately policy-free: edge handling beyond simple
//! clamping (e.g. exponential backward extrapolation for delayed clinical
//! curves) belongs to the callers.
//!
//! Conventions
//! -----------
//! - Grids (`xp`) are assumed strictly increasing; callers uphold this because
//!   every grid in the crate comes from an append-only time table that already
//!   enforces monotonicity.
//! - Queries outside the grid clamp to the first/last ordinate, matching the
//!   flat-extrapolation contract of NumPy's `interp`.
//! - `cumtrapz` seeds its output with an explicit initial value so cumulative
//!   series can start from a nonzero baseline (e.g. seeding cumulative cases
//!   with the initial infectious count).

use ndarray::{Array1, ArrayView1};

/// Piecewise-linear interpolation of `(xp, fp)` sampled at `x`.
///
/// For each query point the value is interpolated linearly between the two
/// bracketing grid points; queries before `xp[0]` return `fp[0]` and queries
/// after `xp[last]` return `fp[last]`.
///
/// Query points that coincide with grid points reproduce the corresponding
/// ordinate exactly (no arithmetic is performed on an exact hit), which the
/// zero-delay identity of the clinical delay transform relies on.
///
/// # Panics
/// Panics if `xp` and `fp` have different lengths or are empty; both are
/// programming errors at the call sites in this crate.
pub fn interp(x: ArrayView1<f64>, xp: ArrayView1<f64>, fp: ArrayView1<f64>) -> Array1<f64> {
    assert_eq!(xp.len(), fp.len(), "grid and ordinate lengths must match");
    assert!(!xp.is_empty(), "interpolation grid must be non-empty");

    let n = xp.len();
    let mut out = Array1::zeros(x.len());
    for (i, &xq) in x.iter().enumerate() {
        out[i] = if xq <= xp[0] {
            fp[0]
        } else if xq >= xp[n - 1] {
            fp[n - 1]
        } else {
            // Index of the last grid point <= xq.
            let mut lo = 0usize;
            let mut hi = n - 1;
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if xp[mid] <= xq {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            if xp[lo] == xq {
                fp[lo]
            } else {
                let w = (xq - xp[lo]) / (xp[lo + 1] - xp[lo]);
                fp[lo] + w * (fp[lo + 1] - fp[lo])
            }
        };
    }
    out
}

/// Cumulative trapezoidal integral of `y` over the grid `x`, seeded with
/// `initial`.
///
/// Returns an array of the same length as `y` where entry `i` is
/// `initial + ∫ y dx` over `x[0..=i]` (trapezoid rule). Entry `0` is exactly
/// `initial`.
///
/// # Panics
/// Panics if `x` and `y` have different lengths or are empty.
pub fn cumtrapz(y: ArrayView1<f64>, x: ArrayView1<f64>, initial: f64) -> Array1<f64> {
    assert_eq!(x.len(), y.len(), "grid and integrand lengths must match");
    assert!(!x.is_empty(), "integration grid must be non-empty");

    let mut out = Array1::zeros(y.len());
    out[0] = initial;
    let mut acc = initial;
    for i in 1..y.len() {
        acc += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
        out[i] = acc;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Interpolation on-grid (exact hits), between grid points, and the
    //   clamping behavior outside the grid.
    // - Trapezoid integration against closed-form integrals and the seeding
    //   contract (entry 0 equals `initial`).
    //
    // They intentionally DO NOT cover:
    // - Exponential backward extrapolation (a clinical-layer policy layered on
    //   top of `interp`, tested in `clinical::delay`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Exact grid hits must reproduce ordinates bitwise; the zero-delay identity
    // of the clinical delay transform depends on this.
    fn interp_reproduces_grid_points_exactly() {
        let xp = array![0.0, 1.0, 2.0, 3.0];
        let fp = array![10.0, 0.1 + 0.2, -5.0, 7.25];

        let out = interp(xp.view(), xp.view(), fp.view());

        assert_eq!(out, fp);
    }

    #[test]
    // Purpose
    // -------
    // Between grid points the result is the linear blend of the bracketing
    // ordinates.
    fn interp_is_linear_between_grid_points() {
        let xp = array![0.0, 2.0];
        let fp = array![1.0, 3.0];

        let out = interp(array![0.5, 1.0, 1.5].view(), xp.view(), fp.view());

        assert_relative_eq!(out[0], 1.5);
        assert_relative_eq!(out[1], 2.0);
        assert_relative_eq!(out[2], 2.5);
    }

    #[test]
    // Purpose
    // -------
    // Queries outside the grid clamp to the boundary ordinates.
    fn interp_clamps_outside_the_grid() {
        let xp = array![1.0, 2.0];
        let fp = array![4.0, 8.0];

        let out = interp(array![-3.0, 9.0].view(), xp.view(), fp.view());

        assert_eq!(out[0], 4.0);
        assert_eq!(out[1], 8.0);
    }

    #[test]
    // Purpose
    // -------
    // The cumulative trapezoid of a linear integrand matches the closed-form
    // quadratic, and entry 0 carries the seed.
    fn cumtrapz_matches_closed_form_for_linear_integrand() {
        let x = array![0.0, 1.0, 2.0, 3.0];
        let y = array![0.0, 2.0, 4.0, 6.0]; // y = 2x, integral = x^2

        let out = cumtrapz(y.view(), x.view(), 5.0);

        assert_eq!(out[0], 5.0);
        assert_relative_eq!(out[1], 6.0);
        assert_relative_eq!(out[2], 9.0);
        assert_relative_eq!(out[3], 14.0);
    }

    #[test]
    // Purpose
    // -------
    // Uneven grids weight each trapezoid by its own step.
    fn cumtrapz_handles_uneven_grids() {
        let x = array![0.0, 0.5, 2.0];
        let y = array![1.0, 1.0, 1.0];

        let out = cumtrapz(y.view(), x.view(), 0.0);

        assert_relative_eq!(out[1], 0.5);
        assert_relative_eq!(out[2], 2.0);
    }
}
