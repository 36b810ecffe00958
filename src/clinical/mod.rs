//! clinical — progression overlays on infection models.
//!
//! Purpose
//! -------
//! Turn the infectious/exposed curves of a compartmental model into clinical
//! outcome curves: hospitalizations, ICU occupancy, and deaths, optionally
//! under finite healthcare capacity. Overlays are *observers*: they borrow
//! the infection model immutably, never advance time, and recompute every
//! column from the model's current table on each access.
//!
//! Key behaviors
//! -------------
//! - [`delay`] implements the delay transform (interpolated time shifts with
//!   exponential backward extrapolation) all progression timing is built on.
//! - [`params`] carries the clinical parameter table (progression
//!   probabilities, dwell periods, fatality ratios, capacities).
//! - [`model`] defines the [`ClinicalModel`] contract: shared columns,
//!   required hooks defaulting to unsupported-column errors, and the
//!   `"column:transform"` query interface shared with the infection layer.
//! - Three concrete overlays: [`CrudeFr`] (constant fatality ratio),
//!   [`HospitalizationWithDelay`] (admission delays and an ICU stage), and
//!   [`HospitalizationWithOverflow`] (finite capacity with excess
//!   mortality).
//!
//! Downstream usage
//! ----------------
//! Run an infection model first, then wrap it:
//!
//! ```ignore
//! let mut model = EpiModel::seir().with_cases(1_000.0);
//! model.run(90)?;
//! let clinical = HospitalizationWithOverflow::new(&model, ClinicalParams::default())?;
//! let deaths = clinical.get_series("deaths")?;
//! ```

pub mod crude;
pub mod delay;
pub mod hospitalization;
pub mod model;
pub mod overflow;
pub mod params;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::crude::CrudeFr;
pub use self::delay::{delayed, delayed_with_discharge};
pub use self::hospitalization::HospitalizationWithDelay;
pub use self::model::ClinicalModel;
pub use self::overflow::HospitalizationWithOverflow;
pub use self::params::ClinicalParams;
