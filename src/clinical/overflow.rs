//! Capacity-aware hospitalization model: finite beds, overflow, and excess
//! mortality.
//!
//! Wraps the delayed-hospitalization model and confronts its demand curves
//! with finite hospital and ICU surge capacity. Demand above capacity is
//! "overflow": those patients are not admitted, and the portion of overflow
//! integrated over the relevant dwell window (divided by the dwell period)
//! estimates the flow of patients who experienced care outside the system.
//!
//! Mortality splits into the *natural* component — the wrapped model's
//! deaths, i.e. what full-capacity care would produce — and an *excess*
//! component from overflow:
//!
//! - ICU overflow is lethal for the share not already counted by the natural
//!   ICU fatality ratio (`1 − ICUFR`).
//! - Hospital-bed overflow progresses to death with probability
//!   `(Qcr/Qsv) · overflow_bias`, capped at 1 — degraded ward care pushes
//!   more severe cases into critical outcomes, but a probability is still a
//!   probability.
//!
//! Capacity resolution: explicit clinical parameters first, then the
//! infection model's region, then unlimited (an absent capacity means "never
//! binds", not an error). With unlimited capacity every column of this model
//! equals the wrapped delay model's exactly.

use ndarray::{Array1, ArrayView1};

use crate::clinical::hospitalization::HospitalizationWithDelay;
use crate::clinical::model::ClinicalModel;
use crate::clinical::params::ClinicalParams;
use crate::compartmental::errors::EpiResult;
use crate::compartmental::models::EpiModel;
use crate::utils::cumtrapz;

/// Hospitalization overlay with finite bed and ICU capacity.
#[derive(Debug, Clone)]
pub struct HospitalizationWithOverflow<'m> {
    base: HospitalizationWithDelay<'m>,
}

impl<'m> HospitalizationWithOverflow<'m> {
    /// Wrap an initialized infection model.
    ///
    /// # Errors
    /// [`EpiError::Uninitialized`](crate::compartmental::errors::EpiError)
    /// when the model has no simulation table yet.
    pub fn new(infection: &'m EpiModel, params: ClinicalParams) -> EpiResult<Self> {
        Ok(HospitalizationWithOverflow {
            base: HospitalizationWithDelay::new(infection, params)?,
        })
    }

    /// Hospital beds available for epidemic patients: explicit capacity
    /// scaled by free share, else the region's surge capacity, else
    /// unlimited.
    pub fn hospital_surge_capacity(&self) -> f64 {
        let params = self.clinical_params();
        params
            .hospital_capacity
            .map(|c| c * (1.0 - params.hospital_occupancy))
            .or_else(|| {
                self.infection()
                    .region()
                    .and_then(|r| r.hospital_surge_capacity())
            })
            .unwrap_or(f64::INFINITY)
    }

    /// ICU beds available for epidemic patients; same resolution order.
    pub fn icu_surge_capacity(&self) -> f64 {
        let params = self.clinical_params();
        params
            .icu_capacity
            .map(|c| c * (1.0 - params.icu_occupancy))
            .or_else(|| {
                self.infection()
                    .region()
                    .and_then(|r| r.icu_surge_capacity())
            })
            .unwrap_or(f64::INFINITY)
    }

    /// The wrapped model's deaths: mortality under full-capacity care.
    pub fn natural_deaths(&self) -> EpiResult<Array1<f64>> {
        self.base.deaths()
    }

    /// Severe demand above hospital surge capacity.
    pub fn severe_overflow(&self) -> EpiResult<Array1<f64>> {
        let capacity = self.hospital_surge_capacity();
        Ok(self.base.severe()?.mapv(|v| (v - capacity).max(0.0)))
    }

    /// Critical demand above ICU surge capacity.
    pub fn critical_overflow(&self) -> EpiResult<Array1<f64>> {
        let capacity = self.icu_surge_capacity();
        Ok(self.base.critical()?.mapv(|v| (v - capacity).max(0.0)))
    }

    /// Excess deaths from ICU overflow: integrated unserved critical demand
    /// per ICU dwell period, discounted by the natural ICU fatality share.
    pub fn icu_overflow_deaths(&self) -> EpiResult<Array1<f64>> {
        let params = self.clinical_params();
        let overflow = self.critical_overflow()?;
        let scale = 1.0 - params.icu_fatality_ratio;
        let times = self.times();
        let area = cumtrapz(
            (overflow * scale).view(),
            ArrayView1::from(times.as_slice()),
            0.0,
        );
        Ok(area / params.icu_period)
    }

    /// Excess deaths from hospital-bed overflow: integrated unserved severe
    /// demand per hospitalization period, progressing to death with the
    /// bias-inflated critical share (capped at probability 1).
    pub fn hospital_overflow_deaths(&self) -> EpiResult<Array1<f64>> {
        let params = self.clinical_params();
        let overflow = self.severe_overflow()?;
        let times = self.times();
        let area = cumtrapz(overflow.view(), ArrayView1::from(times.as_slice()), 0.0);
        let unserved_cases = area / params.hospitalization_period;
        let excess_probability = ((params.prob_critical / params.prob_severe)
            * params.hospitalization_overflow_bias)
            .min(1.0);
        Ok(unserved_cases * excess_probability)
    }

    /// Total excess deaths from both overflow channels.
    pub fn overflow_deaths(&self) -> EpiResult<Array1<f64>> {
        Ok(self.icu_overflow_deaths()? + self.hospital_overflow_deaths()?)
    }
}

impl ClinicalModel for HospitalizationWithOverflow<'_> {
    fn infection(&self) -> &EpiModel {
        self.base.infection()
    }

    fn clinical_params(&self) -> &ClinicalParams {
        self.base.clinical_params()
    }

    fn model_name(&self) -> &'static str {
        "HospitalizationWithOverflow"
    }

    /// Overflow-specific columns layered over the shared vocabulary.
    fn extra_column(&self, name: &str) -> Option<EpiResult<Array1<f64>>> {
        Some(match name {
            "natural_deaths" => self.natural_deaths(),
            "overflow_deaths" => self.overflow_deaths(),
            "icu_overflow_deaths" => self.icu_overflow_deaths(),
            "hospital_overflow_deaths" => self.hospital_overflow_deaths(),
            "severe_overflow" | "hospital_overflow" => self.severe_overflow(),
            "critical_overflow" | "icu_overflow" => self.critical_overflow(),
            "overflow_death_rate" => self.overflow_deaths().map(first_difference),
            "icu_overflow_death_rate" => self.icu_overflow_deaths().map(first_difference),
            "hospital_overflow_death_rate" => {
                self.hospital_overflow_deaths().map(first_difference)
            }
            _ => return None,
        })
    }

    /// Natural plus overflow mortality.
    fn deaths(&self) -> EpiResult<Array1<f64>> {
        let total = self.natural_deaths()? + self.overflow_deaths()?;
        let overflow_started = self
            .severe_overflow()
            .map(|o| o.iter().any(|&v| v > 0.0))
            .unwrap_or(false);
        if overflow_started {
            log::debug!("{} reporting excess mortality from overflow", self.model_name());
        }
        Ok(total)
    }

    fn severe(&self) -> EpiResult<Array1<f64>> {
        self.base.severe()
    }

    fn severe_cases(&self) -> EpiResult<Array1<f64>> {
        self.base.severe_cases()
    }

    fn critical(&self) -> EpiResult<Array1<f64>> {
        self.base.critical()
    }

    fn critical_cases(&self) -> EpiResult<Array1<f64>> {
        self.base.critical_cases()
    }

    /// Admissions are demand capped by surge capacity.
    fn hospitalized(&self) -> EpiResult<Array1<f64>> {
        let capacity = self.hospital_surge_capacity();
        Ok(self.base.severe()?.mapv(|v| v.min(capacity)))
    }

    /// ICU occupancy is critical demand capped by ICU surge capacity.
    fn icu(&self) -> EpiResult<Array1<f64>> {
        let capacity = self.icu_surge_capacity();
        Ok(self.base.critical()?.mapv(|v| v.min(capacity)))
    }
}

/// First difference with a zero lead-in; daily flow from a cumulative curve.
fn first_difference(cumulative: Array1<f64>) -> Array1<f64> {
    let mut rate = Array1::zeros(cumulative.len());
    for i in 1..cumulative.len() {
        rate[i] = cumulative[i] - cumulative[i - 1];
    }
    rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;
    use approx::assert_relative_eq;

    fn run_model(days: u32) -> EpiModel {
        let mut model = EpiModel::sir().with_population(1e7).with_cases(50_000.0);
        model.run(days).unwrap();
        model
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Capacity resolution order (explicit params > region > unlimited).
    // - Overflow columns vanishing when capacity never binds.
    // - Excess mortality appearing once capacity binds, with the capped
    //   progression probability.
    //
    // The exact infinite-capacity equality against the delay model is pinned
    // in the integration suite.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Explicit parameter capacities win over the region's; absent both, the
    // capacity is unlimited.
    fn capacity_resolution_order() {
        let mut model = run_model(10);
        model = model.with_region(
            Region::new("Atlantis", 1e7)
                .with_capacities(1000.0, 100.0)
                .with_occupancy(0.5),
        );

        let from_region =
            HospitalizationWithOverflow::new(&model, ClinicalParams::default()).unwrap();
        assert_relative_eq!(from_region.hospital_surge_capacity(), 500.0);
        assert_relative_eq!(from_region.icu_surge_capacity(), 50.0);

        let explicit = HospitalizationWithOverflow::new(
            &model,
            ClinicalParams::default()
                .with_capacities(10_000.0, 1_000.0)
                .with_occupancy(0.9),
        )
        .unwrap();
        assert_relative_eq!(explicit.hospital_surge_capacity(), 1_000.0);

        let plain_model = run_model(10);
        let unlimited =
            HospitalizationWithOverflow::new(&plain_model, ClinicalParams::default()).unwrap();
        assert_eq!(unlimited.hospital_surge_capacity(), f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // With unlimited capacity there is no overflow and no excess mortality.
    fn unlimited_capacity_means_no_overflow() {
        let model = run_model(60);
        let clinical =
            HospitalizationWithOverflow::new(&model, ClinicalParams::default()).unwrap();

        assert!(clinical.severe_overflow().unwrap().iter().all(|&v| v == 0.0));
        assert!(clinical.overflow_deaths().unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // A binding capacity produces overflow and strictly more deaths than the
    // capacity-unconstrained model.
    fn binding_capacity_adds_excess_mortality() {
        let model = run_model(90);
        let params = ClinicalParams::default()
            .with_capacities(200.0, 20.0)
            .with_occupancy(0.75);
        let constrained = HospitalizationWithOverflow::new(&model, params).unwrap();
        let unconstrained =
            HospitalizationWithDelay::new(&model, ClinicalParams::default()).unwrap();

        let with_overflow = constrained.deaths().unwrap();
        let without = unconstrained.deaths().unwrap();

        let last = with_overflow.len() - 1;
        assert!(constrained.severe_overflow().unwrap().iter().any(|&v| v > 0.0));
        assert!(with_overflow[last] > without[last]);
    }
}
