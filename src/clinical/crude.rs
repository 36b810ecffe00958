//! Crude fatality-ratio model: the simplest clinical overlay.
//!
//! Deaths are a constant fraction of cumulative cases and severe cases a
//! constant fraction as well; the severe population is the entry-minus-
//! discharge window of the severe-case curve over the hospitalization
//! period. No ICU stage: `critical`/`critical_cases` stay at their
//! unsupported defaults, which is part of this model's contract rather than
//! an omission.
//!
//! Useful as a first-pass overlay when only a case fatality ratio is known,
//! and as the base vocabulary richer models refine.

use ndarray::Array1;

use crate::clinical::delay::delayed_with_discharge;
use crate::clinical::model::{require_initialized, ClinicalModel};
use crate::clinical::params::ClinicalParams;
use crate::compartmental::errors::EpiResult;
use crate::compartmental::models::EpiModel;

/// Constant-fatality clinical overlay.
#[derive(Debug, Clone)]
pub struct CrudeFr<'m> {
    infection: &'m EpiModel,
    params: ClinicalParams,
}

impl<'m> CrudeFr<'m> {
    /// Wrap an initialized infection model.
    ///
    /// # Errors
    /// [`EpiError::Uninitialized`](crate::compartmental::errors::EpiError)
    /// when the model has no simulation table yet.
    pub fn new(infection: &'m EpiModel, params: ClinicalParams) -> EpiResult<Self> {
        require_initialized(infection)?;
        Ok(CrudeFr { infection, params })
    }
}

impl ClinicalModel for CrudeFr<'_> {
    fn infection(&self) -> &EpiModel {
        self.infection
    }

    fn clinical_params(&self) -> &ClinicalParams {
        &self.params
    }

    fn model_name(&self) -> &'static str {
        "CrudeFr"
    }

    /// Deaths as a constant fraction of cumulative cases.
    fn deaths(&self) -> EpiResult<Array1<f64>> {
        Ok(self.cases()? * self.params.case_fatality_ratio)
    }

    /// Cumulative severe cases: a constant fraction of cases.
    fn severe_cases(&self) -> EpiResult<Array1<f64>> {
        Ok(self.cases()? * self.params.prob_severe)
    }

    /// Severe population: severe cases in their hospitalization window.
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compartmental::errors::EpiError;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The constructor's initialization requirement.
    // - The constant-ratio death and severe-case columns.
    // - The unsupported-column contract for the ICU stage.
    //
    // Full clinical pipelines (delay interactions, overflow boundaries) are
    // exercised in the integration suite.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Wrapping an uninitialized model is a constructor-time error, not a
    // deferred query failure.
    fn constructor_requires_an_initialized_model() {
        let model = EpiModel::sir();

        let err = CrudeFr::new(&model, ClinicalParams::default()).unwrap_err();

        match err {
            EpiError::Uninitialized { .. } => {}
            other => panic!("expected Uninitialized, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Deaths track cases times CFR pointwise.
    fn deaths_are_cases_times_cfr() {
        let mut model = EpiModel::sir().with_population(1e6).with_cases(1000.0);
        model.run(30).unwrap();
        let clinical = CrudeFr::new(&model, ClinicalParams::default()).unwrap();

        let deaths = clinical.deaths().unwrap();
        let cases = clinical.cases().unwrap();

        for (d, c) in deaths.iter().zip(cases.iter()) {
            assert_relative_eq!(*d, c * 0.015, max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The ICU stage is outside this model's contract and says so.
    fn critical_columns_are_unsupported() {
        let mut model = EpiModel::sir();
        model.run(5).unwrap();
        let clinical = CrudeFr::new(&model, ClinicalParams::default()).unwrap();

        let err = clinical.get("critical").unwrap_err();

        assert_eq!(
            err,
            EpiError::UnsupportedColumn { model: "CrudeFr", name: "critical" }
        );
    }
}
