//! Integration tests for the clinical progression overlays.
//!
//! Purpose
//! -------
//! - Validate the clinical stack end to end: wrapping a run infection model,
//!   the delay-transform plumbing, the observer contract, and the
//!   capacity/overflow accounting.
//! - Pin the boundary identity between the capacity-aware and the
//!   capacity-unconstrained models.
//!
//! Coverage
//! --------
//! - `clinical::delay`: the zero-delay identity at the overlay level.
//! - `clinical::model::ClinicalModel`: query fall-through (clinical columns,
//!   clinical parameters, infection columns), trait-default unsupported
//!   hooks, and the observer recompute-on-access behavior.
//! - `clinical::{CrudeFr, HospitalizationWithDelay,
//!   HospitalizationWithOverflow}`: column algebra and the
//!   infinite-capacity equality.
//!
//! Exclusions
//! ----------
//! - Interpolation and extrapolation numerics — unit-tested in
//!   `clinical::delay` and `utils`.
//! - Infection-model dynamics — covered by the epidemic pipeline suite.

use approx::assert_relative_eq;
use epidemics::clinical::{
    delayed, ClinicalModel, ClinicalParams, CrudeFr, HospitalizationWithDelay,
    HospitalizationWithOverflow,
};
use epidemics::compartmental::{EpiError, EpiModel};
use ndarray::Array1;

/// Purpose
/// -------
/// Run the shared infection scenario for this suite: a SEIR model seeded
/// from ten thousand cases in a population of ten million, run for `days`.
fn run_infection(days: u32) -> EpiModel {
    let mut model = EpiModel::seir().with_population(1e7).with_cases(10_000.0);
    model.run(days).expect("the default SEIR scenario runs");
    model
}

#[test]
// Purpose
// -------
// The delay transform with zero delay is an exact identity on real model
// output, not just synthetic grids.
fn zero_delay_is_an_identity_on_model_output() {
    let model = run_infection(40);
    let clinical = HospitalizationWithDelay::new(&model, ClinicalParams::default()).unwrap();

    let cases = clinical.cases().unwrap();
    let same = delayed(&clinical.times(), cases.view(), 0.0, 0.7);

    assert_eq!(same, cases);
}

#[test]
// Purpose
// -------
// With unlimited capacity, every column of the overflow model equals the
// capacity-unconstrained delay model exactly: no overflow, no excess
// deaths, identical admissions.
//
// Given
// -----
// - The shared scenario, 90 days; overflow model with no capacities
//   configured (no region either), delay model with the same parameters.
//
// Expect
// ------
// - deaths, severe, severe_cases, critical, critical_cases, hospitalized,
//   hospitalized_cases, icu, and icu_cases agree exactly.
fn infinite_capacity_reproduces_the_delay_model_exactly() {
    let model = run_infection(90);
    let overflow = HospitalizationWithOverflow::new(&model, ClinicalParams::default()).unwrap();
    let delay = HospitalizationWithDelay::new(&model, ClinicalParams::default()).unwrap();

    for column in [
        "deaths",
        "severe",
        "severe_cases",
        "critical",
        "critical_cases",
        "hospitalized",
        "hospitalized_cases",
        "icu",
        "icu_cases",
    ] {
        let unconstrained = delay.get_series(column).unwrap();
        let unlimited = overflow.get_series(column).unwrap();
        assert_eq!(
            unlimited.values, unconstrained.values,
            "column {column:?} diverged at infinite capacity"
        );
    }

    assert!(overflow.overflow_deaths().unwrap().iter().all(|&v| v == 0.0));
}

#[test]
// Purpose
// -------
// A binding ICU capacity produces excess mortality over the natural deaths,
// and the overflow decomposition adds up.
fn overflow_decomposition_adds_up() {
    let model = run_infection(120);
    let params = ClinicalParams::default().with_capacities(5_000.0, 300.0);
    let overflow = HospitalizationWithOverflow::new(&model, params).unwrap();

    let total = overflow.deaths().unwrap();
    let natural = overflow.natural_deaths().unwrap();
    let excess = overflow.overflow_deaths().unwrap();

    let last = total.len() - 1;
    assert!(excess[last] > 0.0, "capacity never bound in a 120-day epidemic");
    for i in 0..total.len() {
        assert_relative_eq!(total[i], natural[i] + excess[i], max_relative = 1e-12);
    }
}

#[test]
// Purpose
// -------
// Clinical queries resolve in layers: overlay columns first, clinical
// parameters next, then the wrapped infection model's columns and epidemic
// parameters.
fn clinical_queries_fall_through_in_order() {
    let model = run_infection(30);
    let clinical = CrudeFr::new(&model, ClinicalParams::default()).unwrap();

    // Overlay column.
    assert_eq!(clinical.get_series("deaths").unwrap().len(), 31);
    // Clinical parameter broadcast (with alias).
    let cfr = clinical.get_series("CFR").unwrap();
    assert!(cfr.values.iter().all(|&v| v == 0.015));
    // Infection compartment and epidemic parameter fall-through.
    assert_eq!(clinical.get_series("exposed").unwrap().len(), 31);
    let r0 = clinical.get_series("R0").unwrap();
    assert!(r0.values.iter().all(|&v| v == 2.74));
    // Transforms ride along.
    let final_deaths = clinical.get("deaths:final").unwrap().into_scalar().unwrap();
    assert!(final_deaths > 0.0);
}

#[test]
// Purpose
// -------
// The empirical case fatality ratio of the crude model converges to its
// configured CFR wherever cases exist.
fn empirical_cfr_matches_the_configured_ratio() {
    let model = run_infection(60);
    let clinical = CrudeFr::new(&model, ClinicalParams::default()).unwrap();

    let empirical = clinical.get_series("empirical_CFR").unwrap();

    for &v in empirical.values.iter() {
        assert_relative_eq!(v, 0.015, max_relative = 1e-9);
    }
}

#[test]
// Purpose
// -------
// The subclass contract: a minimal overlay that implements nothing reports
// unsupported columns for every required hook, while the provided columns
// that only need the infection model still work.
fn unimplemented_hooks_report_unsupported_columns() {
    struct Skeleton<'m> {
        infection: &'m EpiModel,
        params: ClinicalParams,
    }

    impl ClinicalModel for Skeleton<'_> {
        fn infection(&self) -> &EpiModel {
            self.infection
        }
        fn clinical_params(&self) -> &ClinicalParams {
            &self.params
        }
        fn model_name(&self) -> &'static str {
            "Skeleton"
        }
    }

    let model = run_infection(10);
    let skeleton = Skeleton { infection: &model, params: ClinicalParams::default() };

    for column in ["deaths", "severe", "critical", "hospitalized", "icu"] {
        match skeleton.get(column) {
            Err(EpiError::UnsupportedColumn { model: "Skeleton", .. }) => {}
            other => panic!("expected UnsupportedColumn for {column:?}, got {other:?}"),
        }
    }

    // Columns that need only the infection model still resolve.
    assert_eq!(skeleton.get_series("cases").unwrap().len(), 11);
}

#[test]
// Purpose
// -------
// Observer semantics: overlays recompute from the wrapped model's current
// table, so wrapping after a longer run sees the longer history; nothing is
// cached across overlay instances.
fn overlays_observe_the_current_model_state() {
    let mut model = EpiModel::seir().with_population(1e7).with_cases(10_000.0);
    model.run(20).unwrap();
    let short_len = {
        let clinical = CrudeFr::new(&model, ClinicalParams::default()).unwrap();
        clinical.get_series("deaths").unwrap().len()
    };

    model.run(20).unwrap();
    let long_len = {
        let clinical = CrudeFr::new(&model, ClinicalParams::default()).unwrap();
        clinical.get_series("deaths").unwrap().len()
    };

    assert_eq!(short_len, 21);
    assert_eq!(long_len, 41);
}

#[test]
// Purpose
// -------
// The hospital-pathway death estimate: an overlay with severe cases but a
// disowned ICU stage still produces deaths through the hospital fatality
// ratio, mirroring the delay model's fallback.
fn severe_only_overlay_uses_the_hospital_fatality_pathway() {
    struct WardOnly<'m> {
        infection: &'m EpiModel,
        params: ClinicalParams,
    }

    impl ClinicalModel for WardOnly<'_> {
        fn infection(&self) -> &EpiModel {
            self.infection
        }
        fn clinical_params(&self) -> &ClinicalParams {
            &self.params
        }
        fn model_name(&self) -> &'static str {
            "WardOnly"
        }
        fn severe_cases(&self) -> Result<Array1<f64>, EpiError> {
            Ok(self.cases()? * self.params.prob_severe)
        }
        fn deaths(&self) -> Result<Array1<f64>, EpiError> {
            match self.critical_cases() {
                Err(EpiError::UnsupportedColumn { .. }) => {
                    let k = self.growth_factor()?;
                    let at_risk = self.severe_cases()? * self.params.hospital_fatality_ratio;
                    Ok(epidemics::clinical::delayed(
                        &self.times(),
                        at_risk.view(),
                        self.params.hospitalization_period,
                        k,
                    ))
                }
                other => other,
            }
        }
    }

    let model = run_infection(60);
    let ward = WardOnly { infection: &model, params: ClinicalParams::default() };

    let deaths = ward.deaths().unwrap();
    let severe_cases = ward.severe_cases().unwrap();

    let last = deaths.len() - 1;
    assert!(deaths[last] > 0.0);
    assert!(deaths[last] <= severe_cases[last] * 0.05 * (1.0 + 1e-9));
}
