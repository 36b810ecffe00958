//! Fixed-step ODE integration for the compartmental families.
//!
//! Implements the classic fourth-order Runge–Kutta step (with a forward-Euler
//! fallback) over the per-family derivative functions, subdividing each outer
//! interval into `substeps` internal steps for stability.
//!
//! ## Time-dependent parameters
//! Rates are carried as [`Rate`] values — either constants or closures of
//! simulation time (interventions, seasonal forcing). RK4 evaluates the rate
//! set at the three stage times `t`, `t + dt/2`, and `t + dt`; the two middle
//! stages share the midpoint evaluation. Evaluating at stage times (rather
//! than once per outer step) is what keeps time-varying transmission rates
//! from lagging the dynamics by up to a full step.
//!
//! ## Invariants
//! - Derivative rows sum to zero for every family, so closed-model population
//!   is conserved by construction (up to floating-point roundoff).
//! - [`advance`] mutates only the state vector handed to it; appending rows
//!   to the simulation table is the caller's job, one row per *outer* step
//!   regardless of the internal substep count.

use std::sync::Arc;

use ndarray::{array, Array1, ArrayView1};

use crate::compartmental::core::formulas::{seair, ModelFamily};

/// Integration scheme for [`advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Classic fourth-order Runge–Kutta.
    #[default]
    Rk4,
    /// Forward Euler; first-order, kept for cross-checks and cheap previews.
    Euler,
}

/// Options for the fixed-step integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdeOptions {
    pub method: Method,
    /// Internal subdivisions per outer step; at least 1.
    pub substeps: usize,
}

impl Default for OdeOptions {
    fn default() -> Self {
        OdeOptions { method: Method::Rk4, substeps: 4 }
    }
}

/// A model rate: a constant or a function of simulation time.
#[derive(Clone)]
pub enum Rate {
    Constant(f64),
    TimeVarying(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl Rate {
    /// Evaluate the rate at time `t`.
    pub fn at(&self, t: f64) -> f64 {
        match self {
            Rate::Constant(v) => *v,
            Rate::TimeVarying(f) => f(t),
        }
    }

    /// Whether this rate varies with time.
    pub fn is_time_varying(&self) -> bool {
        matches!(self, Rate::TimeVarying(_))
    }
}

impl std::fmt::Debug for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rate::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Rate::TimeVarying(_) => f.write_str("TimeVarying(<fn>)"),
        }
    }
}

/// The full rate vocabulary consumed by the family derivatives.
///
/// Families that do not use a rate simply ignore it (SIR ignores `sigma`,
/// `rho`, and `prob_symptoms`), which lets one rate set drive any family.
#[derive(Debug, Clone)]
pub struct RateSet {
    pub r0: Rate,
    pub gamma: Rate,
    pub sigma: Rate,
    pub rho: Rate,
    pub prob_symptoms: Rate,
}

impl RateSet {
    /// Snapshot every rate at time `t`.
    pub fn at(&self, t: f64) -> RateValues {
        RateValues {
            r0: self.r0.at(t),
            gamma: self.gamma.at(t),
            sigma: self.sigma.at(t),
            rho: self.rho.at(t),
            prob_symptoms: self.prob_symptoms.at(t),
        }
    }
}

/// Rates evaluated at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateValues {
    pub r0: f64,
    pub gamma: f64,
    pub sigma: f64,
    pub rho: f64,
    pub prob_symptoms: f64,
}

impl RateValues {
    /// Transmission rate for the given family at this instant.
    pub fn beta(&self, family: ModelFamily) -> f64 {
        match family {
            ModelFamily::Sir | ModelFamily::Seir => self.r0 * self.gamma,
            ModelFamily::Seair => seair::beta(self.r0, self.gamma, self.prob_symptoms, self.rho),
        }
    }
}

/// Time derivative of the state vector for `family` under `rates`.
///
/// Rows sum to zero: infections move mass from susceptible onward, removals
/// move it to recovered, nothing leaves the system.
pub fn derivative(family: ModelFamily, rates: &RateValues, x: ArrayView1<f64>) -> Array1<f64> {
    let beta = rates.beta(family);
    let gamma = rates.gamma;
    match family {
        ModelFamily::Sir => {
            let (s, i, r) = (x[0], x[1], x[2]);
            let n = s + i + r;
            let infections = beta * s * (i / n);
            array![-infections, infections - gamma * i, gamma * i]
        }
        ModelFamily::Seir => {
            let sigma = rates.sigma;
            let (s, e, i, r) = (x[0], x[1], x[2], x[3]);
            let n = s + e + i + r;
            let infections = beta * s * (i / n);
            array![
                -infections,
                infections - sigma * e,
                sigma * e - gamma * i,
                gamma * i,
            ]
        }
        ModelFamily::Seair => {
            let sigma = rates.sigma;
            let rho = rates.rho;
            let qs = rates.prob_symptoms;
            let (s, e, a, i, r) = (x[0], x[1], x[2], x[3], x[4]);
            let n = s + e + a + i + r;
            let infections = beta * s * ((i + rho * a) / n);
            array![
                -infections,
                infections - sigma * e,
                (1.0 - qs) * sigma * e - gamma * a,
                qs * sigma * e - gamma * i,
                gamma * (i + a),
            ]
        }
    }
}

/// One integration step of size `dt` from `(x, t)`.
///
/// For RK4 the rate set is evaluated at the stage times `t`, `t + dt/2`, and
/// `t + dt`; constant rates make the three snapshots identical and cost
/// nothing extra.
pub fn integration_step(
    family: ModelFamily,
    rates: &RateSet,
    method: Method,
    x: ArrayView1<f64>,
    t: f64,
    dt: f64,
) -> Array1<f64> {
    match method {
        Method::Rk4 => {
            let t_mid = t + 0.5 * dt;
            let t_end = t + dt;

            let p0 = rates.at(t);
            let p1 = rates.at(t_mid);
            let p2 = rates.at(t_end);

            let k1 = derivative(family, &p0, x);
            let k2 = derivative(family, &p1, (&x + &(0.5 * dt * &k1)).view());
            let k3 = derivative(family, &p1, (&x + &(0.5 * dt * &k2)).view());
            let k4 = derivative(family, &p2, (&x + &(dt * &k3)).view());

            &x + &((k1 + 2.0 * k2 + 2.0 * k3 + k4) * (dt / 6.0))
        }
        Method::Euler => {
            let p = rates.at(t);
            &x + &(derivative(family, &p, x) * dt)
        }
    }
}

/// Advance `x` in place from `t0` to `t1` using `options.substeps` internal
/// steps.
///
/// The caller records one table row per call; substeps are invisible outside.
pub fn advance(
    family: ModelFamily,
    rates: &RateSet,
    options: OdeOptions,
    x: &mut Array1<f64>,
    t0: f64,
    t1: f64,
) {
    let substeps = options.substeps.max(1);
    let dt = (t1 - t0) / substeps as f64;
    let mut t = t0;
    for _ in 0..substeps {
        *x = integration_step(family, rates, options.method, x.view(), t, dt);
        t += dt;
    }
}
