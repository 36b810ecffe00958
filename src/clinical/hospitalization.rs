//! Delayed hospitalization model: onset-to-admission lags and an ICU stage.
//!
//! Refines the crude overlay with realistic timing: severe cases lag symptom
//! onset by `severe_delay`, critical cases lag severe ones by the difference
//! of the onset-to-ICU and onset-to-hospital delays, and deaths lag ICU
//! admission by the ICU dwell period. All lags read the upstream curves
//! through the delay transform with backward exponential extrapolation at
//! the infection model's growth factor, so early-epidemic curves are not
//! spuriously zero.
//!
//! Deaths prefer the ICU pathway (`critical_cases · ICUFR`, delayed by the
//! ICU period); if a subtype disowns the ICU stage the computation falls
//! back to the hospital pathway (`severe_cases · HFR`, delayed by the
//! hospitalization period) — mirroring how the crude model would degrade.

use ndarray::Array1;

use crate::clinical::delay::{delayed, delayed_with_discharge};
use crate::clinical::model::{require_initialized, ClinicalModel};
use crate::clinical::params::ClinicalParams;
use crate::compartmental::errors::{EpiError, EpiResult};
use crate::compartmental::models::EpiModel;

/// Hospitalization overlay with admission delays and an ICU stage.
#[derive(Debug, Clone)]
pub struct HospitalizationWithDelay<'m> {
    infection: &'m EpiModel,
    params: ClinicalParams,
}

impl<'m> HospitalizationWithDelay<'m> {
    /// Wrap an initialized infection model.
    ///
    /// # Errors
    /// [`EpiError::Uninitialized`] when the model has no simulation table
    /// yet.
    pub fn new(infection: &'m EpiModel, params: ClinicalParams) -> EpiResult<Self> {
        require_initialized(infection)?;
        Ok(HospitalizationWithDelay { infection, params })
    }
}

impl ClinicalModel for HospitalizationWithDelay<'_> {
    fn infection(&self) -> &EpiModel {
        self.infection
    }

    fn clinical_params(&self) -> &ClinicalParams {
        &self.params
    }

    fn model_name(&self) -> &'static str {
        "HospitalizationWithDelay"
    }

    /// Cumulative severe cases: the case curve scaled by `Qsv`, delayed by
    /// the onset-to-hospitalization lag.
    fn severe_cases(&self) -> EpiResult<Array1<f64>> {
        let k = self.growth_factor()?;
        let scaled = self.cases()? * self.params.prob_severe;
        Ok(delayed(&self.times(), scaled.view(), self.params.severe_delay, k))
    }

    /// Severe population: severe cases inside their hospitalization window.
    fn severe(&self) -> EpiResult<Array1<f64>> {
        let severe_cases = self.severe_cases()?;
        let k = self.growth_factor()?;
        Ok(delayed_with_discharge(
            &self.times(),
            severe_cases.view(),
            0.0,
            self.params.hospitalization_period,
            k,
            true,
        ))
    }

    /// Cumulative critical cases: the severe curve scaled by `Qcr/Qsv`,
    /// delayed by the additional onset-to-ICU lag.
    fn critical_cases(&self) -> EpiResult<Array1<f64>> {
        let k = self.growth_factor()?;
        let scaled =
            self.severe_cases()? * (self.params.prob_critical / self.params.prob_severe);
        let extra_delay = self.params.critical_delay - self.params.severe_delay;
        Ok(delayed(&self.times(), scaled.view(), extra_delay, k))
    }

    /// Critical population: critical cases inside their ICU window.
    fn critical(&self) -> EpiResult<Array1<f64>> {
        let critical_cases = self.critical_cases()?;
        let k = self.growth_factor()?;
        Ok(delayed_with_discharge(
            &self.times(),
            critical_cases.view(),
            0.0,
            self.params.icu_period,
            k,
            true,
        ))
    }

    /// Cumulative deaths through the ICU pathway, falling back to the
    /// hospital pathway when the ICU stage is unsupported.
    fn deaths(&self) -> EpiResult<Array1<f64>> {
        let k = self.growth_factor()?;
        match self.critical_cases() {
            Ok(critical_cases) => {
                let at_risk = critical_cases * self.params.icu_fatality_ratio;
                Ok(delayed(&self.times(), at_risk.view(), self.params.icu_period, k))
            }
            Err(EpiError::UnsupportedColumn { .. }) => {
                let at_risk = self.severe_cases()? * self.params.hospital_fatality_ratio;
                Ok(delayed(
                    &self.times(),
                    at_risk.view(),
                    self.params.hospitalization_period,
                    k,
                ))
            }
            Err(other) => Err(other),
        }
    }
}
