//! Parameter namespace for compartmental models.
//!
//! Purpose
//! -------
//! Resolve named epidemiological parameters to numeric values. Parameters come
//! in two kinds: *primary* parameters are independently settable and stored
//! directly ([`PrimaryParam`]); *derived* parameters are computed on demand
//! from primaries through a per-family formula and, where an inverse formula
//! exists, are settable too by back-solving their designated primary
//! ([`DerivedParam`]). Every stored parameter carries optional metadata (a
//! literature reference string and a probability-distribution descriptor) that
//! is preserved through copies but never consumed by the simulation core.
//!
//! Key behaviors
//! -------------
//! - [`ParamId::parse`] normalizes the string vocabulary, including aliases
//!   (`"Qs"` for `prob_symptoms`), so two spellings of the same parameter can
//!   never diverge into different storage slots.
//! - [`ParamSet::get`] evaluates derived parameters recursively and freshly on
//!   each access — no caching, so a primary update is always visible.
//! - [`ParamSet::set`] on a derived parameter back-solves the primary through
//!   the registered inverse ([`ParamError::NotInvertible`] when there is
//!   none); on a primary the model family must actually expose it
//!   ([`ParamError::NotAFamilyParameter`] otherwise).
//! - [`ParamSet::copy_with`] produces a structural copy with overrides applied
//!   through `set`, leaving the original untouched.
//!
//! Invariants & assumptions
//! ------------------------
//! - Which primaries are *active* depends on the model family: SIR exposes
//!   `R0` and `infectious_period`; SEIR adds `incubation_period`; SEAIR adds
//!   `rho` and `prob_symptoms`. Inactive primaries read as fixed family
//!   constants (SIR behaves as `prob_symptoms = 1`, `rho = 1`,
//!   `incubation_period = 0`).
//! - Periods are floored to [`MIN_PERIOD`] when converted to rates, so a zero
//!   incubation period is a valid configuration (the SIR limit of SEIR)
//!   rather than a division-by-zero error. The substitution is logged.
//! - Stored values are finite; probabilities live in the unit interval and
//!   `prob_symptoms` is strictly positive (it divides seed estimates).
//!
//! Conventions
//! -----------
//! - `gamma = 1 / infectious_period` and `sigma = 1 / incubation_period` are
//!   derived, with reciprocal inverses, so rate-speaking and period-speaking
//!   call sites address the same storage.
//! - `beta` and `K` invert onto `R0` through the family formulas;
//!   `doubling_time` is forward-only (`ln 2 / K`).

use crate::compartmental::core::formulas::ModelFamily;
use crate::compartmental::errors::{ParamError, ParamResult};

/// Periods shorter than this are treated as this long when inverted into
/// rates. Keeps the zero-incubation SIR limit of SEIR finite.
pub const MIN_PERIOD: f64 = 1e-9;

const LN_2: f64 = std::f64::consts::LN_2;

/// Independently settable epidemiological parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryParam {
    /// Basic reproduction number.
    R0,
    /// Mean duration of infectiousness, in days.
    InfectiousPeriod,
    /// Mean incubation (latency) duration, in days.
    IncubationPeriod,
    /// Relative infectiousness of asymptomatic carriers.
    Rho,
    /// Probability that an infection develops symptoms.
    ProbSymptoms,
}

impl PrimaryParam {
    /// Canonical name used in queries and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            PrimaryParam::R0 => "R0",
            PrimaryParam::InfectiousPeriod => "infectious_period",
            PrimaryParam::IncubationPeriod => "incubation_period",
            PrimaryParam::Rho => "rho",
            PrimaryParam::ProbSymptoms => "prob_symptoms",
        }
    }
}

/// Parameters computed from primaries through per-family formulas.
///
/// All variants except `DoublingTime` have a registered inverse and can be
/// assigned, back-solving the designated primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedParam {
    /// Removal rate, `1 / infectious_period`.
    Gamma,
    /// Incubation rate, `1 / incubation_period`.
    Sigma,
    /// Transmission rate; family formula of `R0` and the removal rate.
    Beta,
    /// Early-epidemic exponential growth rate.
    K,
    /// `ln 2 / K`; infinite at `K = 0`. Forward-only.
    DoublingTime,
}

impl DerivedParam {
    /// Canonical name used in queries and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            DerivedParam::Gamma => "gamma",
            DerivedParam::Sigma => "sigma",
            DerivedParam::Beta => "beta",
            DerivedParam::K => "K",
            DerivedParam::DoublingTime => "doubling_time",
        }
    }
}

/// A parsed, alias-normalized parameter identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamId {
    Primary(PrimaryParam),
    Derived(DerivedParam),
}

impl ParamId {
    /// Parse a parameter name, resolving aliases to their canonical slot.
    ///
    /// Recognized aliases: `"Qs"` → `prob_symptoms`. Everything else must be a
    /// canonical name; unknown names fail with
    /// [`ParamError::UnknownParameter`].
    pub fn parse(name: &str) -> ParamResult<Self> {
        match name {
            "R0" => Ok(ParamId::Primary(PrimaryParam::R0)),
            "infectious_period" => Ok(ParamId::Primary(PrimaryParam::InfectiousPeriod)),
            "incubation_period" => Ok(ParamId::Primary(PrimaryParam::IncubationPeriod)),
            "rho" => Ok(ParamId::Primary(PrimaryParam::Rho)),
            "prob_symptoms" | "Qs" => Ok(ParamId::Primary(PrimaryParam::ProbSymptoms)),
            "gamma" => Ok(ParamId::Derived(DerivedParam::Gamma)),
            "sigma" => Ok(ParamId::Derived(DerivedParam::Sigma)),
            "beta" => Ok(ParamId::Derived(DerivedParam::Beta)),
            "K" => Ok(ParamId::Derived(DerivedParam::K)),
            "doubling_time" => Ok(ParamId::Derived(DerivedParam::DoublingTime)),
            other => Err(ParamError::UnknownParameter { name: other.to_string() }),
        }
    }

    /// Canonical name of the identified parameter.
    pub const fn name(self) -> &'static str {
        match self {
            ParamId::Primary(p) => p.name(),
            ParamId::Derived(d) => d.name(),
        }
    }
}

/// Probability-distribution descriptor attached to a parameter.
///
/// Carried for sensitivity/Monte Carlo workflows layered on top of the core;
/// the simulation itself never samples from it. [`ParamPdf::mean`] evaluates
/// the descriptor through the corresponding `statrs` distribution, which also
/// validates the stored shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamPdf {
    Normal { mean: f64, std_dev: f64 },
    LogNormal { location: f64, scale: f64 },
    Uniform { min: f64, max: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
}

impl ParamPdf {
    /// Mean of the described distribution.
    ///
    /// # Errors
    /// [`ParamError::InvalidParameter`] when the stored shape parameters are
    /// rejected by the underlying distribution constructor.
    pub fn mean(&self) -> ParamResult<f64> {
        use statrs::distribution::{LogNormal, Normal, Triangular, Uniform};
        use statrs::statistics::Distribution;

        let invalid = |name: &'static str, value: f64| ParamError::InvalidParameter {
            name,
            value,
            reason: "rejected by the distribution constructor",
        };

        let mean = match *self {
            ParamPdf::Normal { mean, std_dev } => Normal::new(mean, std_dev)
                .map_err(|_| invalid("pdf.std_dev", std_dev))?
                .mean(),
            ParamPdf::LogNormal { location, scale } => LogNormal::new(location, scale)
                .map_err(|_| invalid("pdf.scale", scale))?
                .mean(),
            ParamPdf::Uniform { min, max } => {
                Uniform::new(min, max).map_err(|_| invalid("pdf.max", max))?.mean()
            }
            ParamPdf::Triangular { min, mode, max } => Triangular::new(min, max, mode)
                .map_err(|_| invalid("pdf.mode", mode))?
                .mean(),
        };
        mean.ok_or(ParamError::InvalidParameter {
            name: "pdf",
            value: f64::NAN,
            reason: "distribution has no defined mean",
        })
    }
}

/// A parameter value with optional literature reference and distribution
/// descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub value: f64,
    pub reference: Option<String>,
    pub pdf: Option<ParamPdf>,
}

impl Param {
    /// Bare value with no metadata.
    pub fn new(value: f64) -> Self {
        Param { value, reference: None, pdf: None }
    }

    /// Attach a literature reference string.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Attach a probability-distribution descriptor.
    pub fn with_pdf(mut self, pdf: ParamPdf) -> Self {
        self.pdf = Some(pdf);
        self
    }
}

/// Stored primary parameters. One optional slot per primary; inactive slots
/// for a family are simply never written.
#[derive(Debug, Clone, PartialEq, Default)]
struct Store {
    r0: Option<Param>,
    infectious_period: Option<Param>,
    incubation_period: Option<Param>,
    rho: Option<Param>,
    prob_symptoms: Option<Param>,
}

impl Store {
    fn slot(&self, p: PrimaryParam) -> &Option<Param> {
        match p {
            PrimaryParam::R0 => &self.r0,
            PrimaryParam::InfectiousPeriod => &self.infectious_period,
            PrimaryParam::IncubationPeriod => &self.incubation_period,
            PrimaryParam::Rho => &self.rho,
            PrimaryParam::ProbSymptoms => &self.prob_symptoms,
        }
    }

    fn slot_mut(&mut self, p: PrimaryParam) -> &mut Option<Param> {
        match p {
            PrimaryParam::R0 => &mut self.r0,
            PrimaryParam::InfectiousPeriod => &mut self.infectious_period,
            PrimaryParam::IncubationPeriod => &mut self.incubation_period,
            PrimaryParam::Rho => &mut self.rho,
            PrimaryParam::ProbSymptoms => &mut self.prob_symptoms,
        }
    }
}

/// A set of epidemiological parameters bound to a model family.
///
/// Construct with [`ParamSet::for_family`] (family defaults) or
/// [`ParamSet::sparse`] (no stored values; reads of unset active primaries
/// yield [`ParamError::MissingParameter`], which is how formula-argument
/// resolution surfaces missing inputs).
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    family: ModelFamily,
    store: Store,
}

impl ParamSet {
    /// Parameter set pre-filled with the family's default values.
    pub fn for_family(family: ModelFamily) -> Self {
        let mut set = ParamSet::sparse(family);
        for (p, value) in family.default_primaries() {
            *set.store.slot_mut(p) = Some(Param::new(value));
        }
        set
    }

    /// Parameter set with no stored values.
    pub fn sparse(family: ModelFamily) -> Self {
        ParamSet { family, store: Store::default() }
    }

    /// The family this set is bound to.
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// Whether the family exposes `p` as settable.
    pub fn is_active(&self, p: PrimaryParam) -> bool {
        self.family.active_primaries().contains(&p)
    }

    /// Resolve a parameter to a value.
    ///
    /// Primary parameters read their stored slot (or the fixed family
    /// constant when inactive); derived parameters are evaluated freshly from
    /// the primaries on every call.
    ///
    /// # Errors
    /// [`ParamError::MissingParameter`] when an active primary has no stored
    /// value (sparse sets); errors from the family formulas otherwise.
    pub fn get(&self, id: ParamId) -> ParamResult<f64> {
        match id {
            ParamId::Primary(p) => self.get_primary(p),
            ParamId::Derived(d) => self.get_derived(d),
        }
    }

    /// Parse a name (resolving aliases) and [`get`](Self::get) it.
    pub fn get_named(&self, name: &str) -> ParamResult<f64> {
        self.get(ParamId::parse(name)?)
    }

    /// Full stored parameter (value + metadata) for an active primary.
    pub fn get_param(&self, p: PrimaryParam) -> ParamResult<&Param> {
        if !self.is_active(p) {
            return Err(ParamError::NotAFamilyParameter {
                name: p.name(),
                family: self.family.name(),
            });
        }
        self.store.slot(p).as_ref().ok_or(ParamError::MissingParameter { name: p.name() })
    }

    /// Assign a bare value; see [`set_param`](Self::set_param).
    pub fn set(&mut self, id: ParamId, value: f64) -> ParamResult<()> {
        self.set_param(id, Param::new(value))
    }

    /// Parse a name (resolving aliases) and [`set`](Self::set) it.
    pub fn set_named(&mut self, name: &str, value: f64) -> ParamResult<()> {
        self.set(ParamId::parse(name)?, value)
    }

    /// Assign a parameter.
    ///
    /// Primary targets store the value (with metadata) after validation.
    /// Derived targets back-solve their designated primary through the
    /// registered inverse formula; the metadata travels to the back-solved
    /// primary so references survive either spelling.
    ///
    /// # Errors
    /// - [`ParamError::NotAFamilyParameter`] for primaries the family does not
    ///   expose.
    /// - [`ParamError::NotInvertible`] for derived parameters without an
    ///   inverse (`doubling_time`).
    /// - [`ParamError::InvalidParameter`] for non-finite or out-of-domain
    ///   values.
    pub fn set_param(&mut self, id: ParamId, param: Param) -> ParamResult<()> {
        match id {
            ParamId::Primary(p) => self.set_primary(p, param),
            ParamId::Derived(d) => self.set_derived(d, param),
        }
    }

    /// Structural copy with overrides applied through `set`.
    ///
    /// The original is untouched; metadata on non-overridden parameters is
    /// preserved.
    pub fn copy_with<I>(&self, overrides: I) -> ParamResult<ParamSet>
    where
        I: IntoIterator<Item = (ParamId, f64)>,
    {
        let mut copy = self.clone();
        for (id, value) in overrides {
            copy.set(id, value)?;
        }
        Ok(copy)
    }

    /// Stored primaries in declaration order, for summaries and bindings.
    pub fn stored(&self) -> Vec<(PrimaryParam, &Param)> {
        [
            PrimaryParam::R0,
            PrimaryParam::InfectiousPeriod,
            PrimaryParam::IncubationPeriod,
            PrimaryParam::Rho,
            PrimaryParam::ProbSymptoms,
        ]
        .iter()
        .filter_map(|&p| self.store.slot(p).as_ref().map(|param| (p, param)))
        .collect()
    }

    // ---- Helper methods ----

    fn get_primary(&self, p: PrimaryParam) -> ParamResult<f64> {
        if self.is_active(p) {
            self.store
                .slot(p)
                .as_ref()
                .map(|param| param.value)
                .ok_or(ParamError::MissingParameter { name: p.name() })
        } else {
            Ok(self.family.fixed_primary(p))
        }
    }

    fn get_derived(&self, d: DerivedParam) -> ParamResult<f64> {
        match d {
            DerivedParam::Gamma => {
                Ok(rate_from_period(self.get_primary(PrimaryParam::InfectiousPeriod)?, "gamma"))
            }
            DerivedParam::Sigma => {
                Ok(rate_from_period(self.get_primary(PrimaryParam::IncubationPeriod)?, "sigma"))
            }
            DerivedParam::Beta => self.family.beta(self),
            DerivedParam::K => self.family.k(self),
            DerivedParam::DoublingTime => {
                let k = self.get_derived(DerivedParam::K)?;
                Ok(if k == 0.0 { f64::INFINITY } else { LN_2 / k })
            }
        }
    }

    fn set_primary(&mut self, p: PrimaryParam, param: Param) -> ParamResult<()> {
        if !self.is_active(p) {
            return Err(ParamError::NotAFamilyParameter {
                name: p.name(),
                family: self.family.name(),
            });
        }
        validate_primary(p, param.value)?;
        *self.store.slot_mut(p) = Some(param);
        Ok(())
    }

    fn set_derived(&mut self, d: DerivedParam, param: Param) -> ParamResult<()> {
        let value = param.value;
        if !value.is_finite() {
            return Err(ParamError::InvalidParameter {
                name: d.name(),
                value,
                reason: "must be finite",
            });
        }
        match d {
            DerivedParam::Gamma => {
                let period = invert_rate(value, "gamma")?;
                self.set_primary(PrimaryParam::InfectiousPeriod, Param { value: period, ..param })
            }
            DerivedParam::Sigma => {
                let period = invert_rate(value, "sigma")?;
                self.set_primary(PrimaryParam::IncubationPeriod, Param { value: period, ..param })
            }
            DerivedParam::Beta => {
                let r0 = self.family.r0_from_beta(value, self)?;
                self.set_primary(PrimaryParam::R0, Param { value: r0, ..param })
            }
            DerivedParam::K => {
                let r0 = self.family.r0_from_k(value, self)?;
                self.set_primary(PrimaryParam::R0, Param { value: r0, ..param })
            }
            DerivedParam::DoublingTime => Err(ParamError::NotInvertible { name: d.name() }),
        }
    }
}

/// Convert a period to a rate, flooring near-zero periods to [`MIN_PERIOD`].
///
/// An exact zero is the designed degenerate limit (no incubation stage) and
/// stays silent; a positive period below the floor is suspicious and warns.
fn rate_from_period(period: f64, rate_name: &str) -> f64 {
    if period < MIN_PERIOD {
        if period > 0.0 {
            log::warn!("period for {rate_name} below {MIN_PERIOD}; substituting the floor");
        }
        1.0 / MIN_PERIOD
    } else {
        1.0 / period
    }
}

/// Invert a strictly positive rate into a period.
fn invert_rate(rate: f64, name: &'static str) -> ParamResult<f64> {
    if rate <= 0.0 {
        return Err(ParamError::InvalidParameter {
            name,
            value: rate,
            reason: "rates must be strictly positive",
        });
    }
    Ok(1.0 / rate)
}

fn validate_primary(p: PrimaryParam, value: f64) -> ParamResult<()> {
    let invalid = |reason| ParamError::InvalidParameter { name: p.name(), value, reason };
    if !value.is_finite() {
        return Err(invalid("must be finite"));
    }
    match p {
        PrimaryParam::R0 => {
            if value < 0.0 {
                return Err(invalid("must be non-negative"));
            }
        }
        PrimaryParam::InfectiousPeriod | PrimaryParam::IncubationPeriod => {
            if value < 0.0 {
                return Err(invalid("periods must be non-negative"));
            }
        }
        PrimaryParam::Rho => {
            if value < 0.0 {
                return Err(invalid("must be non-negative"));
            }
        }
        PrimaryParam::ProbSymptoms => {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid("must lie in (0, 1]"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Alias normalization (one storage slot per parameter).
    // - Primary/derived get and set, including inverse back-solving and the
    //   forward-only doubling time.
    // - Family gating of settable primaries and the fixed constants behind
    //   inactive ones.
    // - Sparse sets surfacing MissingParameter.
    // - copy_with preserving the original and its metadata.
    //
    // Formula numerics themselves are covered in `core::formulas`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // "Qs" and "prob_symptoms" must resolve to the same slot, so setting one
    // and reading the other round-trips.
    //
    // Given
    // -----
    // - A SEAIR default set (prob_symptoms active).
    //
    // Expect
    // ------
    // - set via alias, get via canonical name (and vice versa) agree.
    fn aliases_share_one_storage_slot() {
        let mut params = ParamSet::for_family(ModelFamily::Seair);

        params.set_named("Qs", 0.5).unwrap();
        assert_relative_eq!(params.get_named("prob_symptoms").unwrap(), 0.5);

        params.set_named("prob_symptoms", 0.25).unwrap();
        assert_relative_eq!(params.get_named("Qs").unwrap(), 0.25);
    }

    #[test]
    // Purpose
    // -------
    // gamma is the reciprocal of infectious_period and setting gamma
    // back-solves the period.
    fn gamma_round_trips_through_infectious_period() {
        let mut params = ParamSet::for_family(ModelFamily::Sir);

        params.set_named("infectious_period", 4.0).unwrap();
        assert_relative_eq!(params.get_named("gamma").unwrap(), 0.25);

        params.set_named("gamma", 0.5).unwrap();
        assert_relative_eq!(params.get_named("infectious_period").unwrap(), 2.0);
    }

    #[test]
    // Purpose
    // -------
    // Setting K back-solves R0 through the family inverse, and the forward
    // formula then reproduces K (round-trip invariant).
    fn setting_k_back_solves_r0() {
        let mut params = ParamSet::for_family(ModelFamily::Sir);
        params.set_named("infectious_period", 4.0).unwrap();

        params.set_named("K", 0.25).unwrap();

        // K_SIR = gamma * (R0 - 1) => R0 = 1 + K/gamma = 2.0
        assert_relative_eq!(params.get_named("R0").unwrap(), 2.0);
        assert_relative_eq!(params.get_named("K").unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // doubling_time has no inverse; assigning it reports the configuration
    // error instead of guessing a primary.
    fn doubling_time_is_not_settable() {
        let mut params = ParamSet::for_family(ModelFamily::Sir);

        let err = params.set_named("doubling_time", 3.0).unwrap_err();

        assert_eq!(err, ParamError::NotInvertible { name: "doubling_time" });
    }

    #[test]
    // Purpose
    // -------
    // SIR does not expose prob_symptoms: reads see the fixed constant 1.0 and
    // writes are rejected.
    fn sir_treats_prob_symptoms_as_fixed() {
        let mut params = ParamSet::for_family(ModelFamily::Sir);

        assert_relative_eq!(params.get_named("prob_symptoms").unwrap(), 1.0);
        let err = params.set_named("prob_symptoms", 0.5).unwrap_err();
        assert_eq!(
            err,
            ParamError::NotAFamilyParameter { name: "prob_symptoms", family: "SIR" }
        );
    }

    #[test]
    // Purpose
    // -------
    // Sparse sets have no values; reading an active primary reports which one
    // is missing.
    fn sparse_set_reports_missing_primaries() {
        let params = ParamSet::sparse(ModelFamily::Seir);

        let err = params.get_named("R0").unwrap_err();

        assert_eq!(err, ParamError::MissingParameter { name: "R0" });
    }

    #[test]
    // Purpose
    // -------
    // copy_with applies overrides to the copy only and keeps metadata on
    // untouched parameters.
    fn copy_with_leaves_the_original_untouched() {
        let mut params = ParamSet::for_family(ModelFamily::Sir);
        params
            .set_param(
                ParamId::Primary(PrimaryParam::R0),
                Param::new(2.0).with_reference("Verity et al. (2020)"),
            )
            .unwrap();

        let copy = params
            .copy_with([(ParamId::Primary(PrimaryParam::InfectiousPeriod), 10.0)])
            .unwrap();

        assert_relative_eq!(params.get_named("infectious_period").unwrap(), 3.69 + 3.47);
        assert_relative_eq!(copy.get_named("infectious_period").unwrap(), 10.0);
        let copied_r0 = copy.get_param(PrimaryParam::R0).unwrap();
        assert_eq!(copied_r0.reference.as_deref(), Some("Verity et al. (2020)"));
    }

    #[test]
    // Purpose
    // -------
    // A zero incubation period is a valid configuration (the SIR limit); the
    // derived sigma is floored, not an error, and K degenerates toward the
    // SIR growth rate.
    fn zero_incubation_period_floors_sigma() {
        let mut params = ParamSet::for_family(ModelFamily::Seir);
        params.set_named("incubation_period", 0.0).unwrap();
        params.set_named("infectious_period", 4.0).unwrap();
        params.set_named("R0", 2.0).unwrap();

        let sigma = params.get_named("sigma").unwrap();
        assert!(sigma.is_finite() && sigma > 0.0);

        // K_SEIR -> K_SIR = gamma * (R0 - 1) = 0.25 in the sigma -> inf limit.
        assert_relative_eq!(params.get_named("K").unwrap(), 0.25, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // The pdf descriptor is preserved through copies and can be evaluated
    // through its statrs distribution.
    fn pdf_descriptor_survives_copies() {
        let mut params = ParamSet::for_family(ModelFamily::Sir);
        params
            .set_param(
                ParamId::Primary(PrimaryParam::R0),
                Param::new(2.74).with_pdf(ParamPdf::Normal { mean: 2.74, std_dev: 0.3 }),
            )
            .unwrap();

        let copy = params.copy_with([]).unwrap();
        let pdf = copy.get_param(PrimaryParam::R0).unwrap().pdf.unwrap();

        assert_relative_eq!(pdf.mean().unwrap(), 2.74);
    }

    #[test]
    // Purpose
    // -------
    // At the epidemic threshold the growth rate is zero and the doubling
    // time is infinite, not an error.
    fn doubling_time_is_infinite_at_threshold() {
        let mut params = ParamSet::for_family(ModelFamily::Sir);
        params.set_named("R0", 1.0).unwrap();

        assert_eq!(params.get_named("K").unwrap(), 0.0);
        assert_eq!(params.get_named("doubling_time").unwrap(), f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Out-of-domain probabilities are rejected, never clamped.
    fn probabilities_outside_the_unit_interval_are_rejected() {
        let mut params = ParamSet::for_family(ModelFamily::Seair);

        let err = params.set_named("prob_symptoms", 1.5).unwrap_err();

        match err {
            ParamError::InvalidParameter { name: "prob_symptoms", .. } => {}
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }
}
