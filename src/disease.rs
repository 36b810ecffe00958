//! Disease parameter providers.
//!
//! A [`Disease`] is a named source of default epidemiological and clinical
//! parameters, consulted once at model construction. It does not participate
//! in the simulation afterwards; models copy what they need.
//!
//! The built-in [`Disease::covid19`] table carries the literature defaults
//! the crate ships with. The SIR entry folds the incubation period into the
//! infectious period so the SIR and SEIR parameterizations describe the same
//! generation time.

use crate::clinical::params::ClinicalParams;
use crate::compartmental::core::{ModelFamily, ParamSet};

/// A named source of default parameters for one disease.
#[derive(Debug, Clone, PartialEq)]
pub struct Disease {
    pub name: String,
    r0: f64,
    infectious_period: f64,
    incubation_period: f64,
    rho: f64,
    prob_symptoms: f64,
    clinical: ClinicalParams,
}

impl Disease {
    /// The built-in covid-19 default table.
    pub fn covid19() -> Self {
        Disease {
            name: "covid-19".to_string(),
            r0: 2.74,
            infectious_period: 3.47,
            incubation_period: 3.69,
            rho: 0.55,
            prob_symptoms: 0.14,
            clinical: ClinicalParams::default(),
        }
    }

    /// Epidemic parameter defaults for the given family.
    ///
    /// SIR has no separate incubation stage, so its infectious period absorbs
    /// the incubation period.
    pub fn epidemic_params(&self, family: ModelFamily) -> ParamSet {
        let mut params = ParamSet::sparse(family);
        let set = |params: &mut ParamSet, name: &str, value: f64| {
            // Names and families are fixed here; failures are table bugs.
            params
                .set_named(name, value)
                .expect("disease defaults must match the family vocabulary");
        };
        match family {
            ModelFamily::Sir => {
                set(&mut params, "R0", self.r0);
                set(
                    &mut params,
                    "infectious_period",
                    self.infectious_period + self.incubation_period,
                );
            }
            ModelFamily::Seir => {
                set(&mut params, "R0", self.r0);
                set(&mut params, "infectious_period", self.infectious_period);
                set(&mut params, "incubation_period", self.incubation_period);
            }
            ModelFamily::Seair => {
                set(&mut params, "R0", self.r0);
                set(&mut params, "infectious_period", self.infectious_period);
                set(&mut params, "incubation_period", self.incubation_period);
                set(&mut params, "rho", self.rho);
                set(&mut params, "prob_symptoms", self.prob_symptoms);
            }
        }
        params
    }

    /// Clinical parameter defaults.
    pub fn clinical_params(&self) -> ClinicalParams {
        self.clinical.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // The default table and the SIR incubation-folding rule.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // SIR absorbs the incubation period; SEIR keeps the stages separate.
    fn sir_defaults_fold_the_incubation_period() {
        let disease = Disease::covid19();

        let sir = disease.epidemic_params(ModelFamily::Sir);
        let seir = disease.epidemic_params(ModelFamily::Seir);

        assert_relative_eq!(sir.get_named("infectious_period").unwrap(), 3.47 + 3.69);
        assert_relative_eq!(seir.get_named("infectious_period").unwrap(), 3.47);
        assert_relative_eq!(seir.get_named("incubation_period").unwrap(), 3.69);
    }

    #[test]
    // Purpose
    // -------
    // A model built from a disease table carries its parameters and can run.
    fn models_wire_in_disease_defaults() {
        use crate::compartmental::models::EpiModel;

        let disease = Disease::covid19();
        let mut model = EpiModel::seair().with_disease(&disease);
        model.run(5).unwrap();

        assert_relative_eq!(model.params().get_named("rho").unwrap(), 0.55);
        assert_relative_eq!(model.params().get_named("Qs").unwrap(), 0.14);
    }
}
