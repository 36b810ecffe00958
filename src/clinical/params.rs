//! Clinical parameter set: progression probabilities, dwell periods, and
//! capacity configuration.
//!
//! A plain configuration carrier in the spirit of the epidemic parameter
//! defaults: every field has a literature-backed default and can be
//! overridden struct-update style or through the builder methods. Capacity
//! fields are optional — when absent, overflow-aware models consult the
//! model's region and finally fall back to unlimited capacity.
//!
//! Naming follows the epidemiological shorthand used throughout the crate:
//! `Qsv = prob_severe`, `Qcr = prob_critical`, `CFR = case_fatality_ratio`,
//! `HFR = hospital_fatality_ratio`, `ICUFR = icu_fatality_ratio`.

/// Clinical progression parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalParams {
    /// Probability that a case becomes severe (requires a hospital bed).
    pub prob_severe: f64,
    /// Probability that a case becomes critical (requires ICU care).
    pub prob_critical: f64,
    /// Mean hospital stay for severe cases, days.
    pub hospitalization_period: f64,
    /// Mean ICU stay for critical cases, days.
    pub icu_period: f64,
    /// Symptom onset to hospital admission, days.
    pub severe_delay: f64,
    /// Symptom onset to ICU admission, days.
    pub critical_delay: f64,
    /// Deaths per case.
    pub case_fatality_ratio: f64,
    /// Deaths per infection (cases plus unobserved infections).
    pub infection_fatality_ratio: f64,
    /// Deaths per hospitalized case.
    pub hospital_fatality_ratio: f64,
    /// Deaths per ICU case.
    pub icu_fatality_ratio: f64,
    /// Inflation of the severe-to-critical progression under overflow
    /// (degraded care); the resulting probability is capped at 1.
    pub hospitalization_overflow_bias: f64,
    /// Explicit hospital bed count; `None` defers to the region, then to
    /// unlimited capacity.
    pub hospital_capacity: Option<f64>,
    /// Explicit ICU bed count; `None` defers to the region, then to
    /// unlimited capacity.
    pub icu_capacity: Option<f64>,
    /// Baseline share of hospital beds already occupied.
    pub hospital_occupancy: f64,
    /// Baseline share of ICU beds already occupied.
    pub icu_occupancy: f64,
}

impl Default for ClinicalParams {
    fn default() -> Self {
        ClinicalParams {
            prob_severe: 0.18,
            prob_critical: 0.05,
            hospitalization_period: 7.0,
            icu_period: 7.5,
            severe_delay: 5.0,
            critical_delay: 7.0,
            case_fatality_ratio: 0.015,
            infection_fatality_ratio: 0.015 * 0.14,
            hospital_fatality_ratio: 0.05,
            icu_fatality_ratio: 0.015 / 0.05,
            hospitalization_overflow_bias: 0.25,
            hospital_capacity: None,
            icu_capacity: None,
            hospital_occupancy: 0.75,
            icu_occupancy: 0.75,
        }
    }
}

impl ClinicalParams {
    /// Set explicit bed capacities (overrides any region data).
    pub fn with_capacities(mut self, hospital: f64, icu: f64) -> Self {
        self.hospital_capacity = Some(hospital);
        self.icu_capacity = Some(icu);
        self
    }

    /// Set one occupancy share for both bed pools.
    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.hospital_occupancy = occupancy;
        self.icu_occupancy = occupancy;
        self
    }

    /// Broadcastable value behind a clinical parameter name, with the usual
    /// shorthand aliases. `None` for names outside the clinical vocabulary.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        Some(match name {
            "prob_severe" | "Qsv" => self.prob_severe,
            "prob_critical" | "Qcr" => self.prob_critical,
            "hospitalization_period" => self.hospitalization_period,
            "icu_period" => self.icu_period,
            "severe_delay" => self.severe_delay,
            "critical_delay" => self.critical_delay,
            "case_fatality_ratio" | "CFR" => self.case_fatality_ratio,
            "infection_fatality_ratio" | "IFR" => self.infection_fatality_ratio,
            "hospital_fatality_ratio" | "HFR" => self.hospital_fatality_ratio,
            "icu_fatality_ratio" | "ICUFR" => self.icu_fatality_ratio,
            "hospitalization_overflow_bias" => self.hospitalization_overflow_bias,
            _ => return None,
        })
    }
}
