//! Errors for the compartmental simulation stack (parameter resolution,
//! column queries, and model configuration).
//!
//! This module defines a parameter error type, [`ParamError`], raised by the
//! parameter namespace and the formula layer, and a model error type,
//! [`EpiError`], raised by the model/query/clinical layers. Both implement
//! `Display`/`Error`; `ParamError` converts into `EpiError` so model-level
//! code can propagate parameter failures with `?`.
//!
//! ## Conventions
//! - Every error is raised synchronously at the point of detection; nothing is
//!   retried (there is no transient-failure notion in pure computation).
//! - Domain violations are never clamped silently: an exponential-growth seed
//!   estimator given `R0 <= 1` fails with [`ParamError::InvalidParameter`].
//! - The one deliberate exception is near-zero incubation/infectious periods,
//!   which are floored to a tiny positive value when converted to rates so
//!   that SIR stays expressible as the zero-incubation limit of SEIR. That
//!   substitution logs a warning and never errors.

/// Result alias for parameter-namespace and formula operations.
pub type ParamResult<T> = Result<T, ParamError>;

/// Result alias for model, query, and clinical operations.
pub type EpiResult<T> = Result<T, EpiError>;

/// Errors raised while resolving, validating, or assigning parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A formula or lookup needed a parameter that is neither stored nor
    /// derivable from the stored ones.
    MissingParameter { name: &'static str },

    /// A parameter value violates a domain precondition (e.g. `R0 <= 1`
    /// passed to an exponential-growth seed estimator).
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// A parameter name that is not part of the vocabulary (after alias
    /// normalization).
    UnknownParameter { name: String },

    /// Attempted to set a derived parameter that has no registered inverse
    /// formula.
    NotInvertible { name: &'static str },

    /// Attempted to set a primary parameter that the model family does not
    /// expose (e.g. `prob_symptoms` on a SIR model, where it is fixed at 1).
    NotAFamilyParameter { name: &'static str, family: &'static str },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::MissingParameter { name } => {
                write!(f, "missing required parameter: {name}")
            }
            ParamError::InvalidParameter { name, value, reason } => {
                write!(f, "invalid value {value} for parameter {name}: {reason}")
            }
            ParamError::UnknownParameter { name } => {
                write!(f, "unknown parameter name: {name:?}")
            }
            ParamError::NotInvertible { name } => {
                write!(f, "derived parameter {name} has no registered inverse and cannot be set")
            }
            ParamError::NotAFamilyParameter { name, family } => {
                write!(f, "parameter {name} is not settable on the {family} family")
            }
        }
    }
}

/// Errors raised by models, column queries, and clinical overlays.
#[derive(Debug, Clone, PartialEq)]
pub enum EpiError {
    /// A parameter-level failure surfaced through a model operation.
    Param(ParamError),

    /// A column name that resolves to neither a derived column, a state
    /// component, nor a parameter.
    UnknownColumn { name: String },

    /// A column that is part of the clinical contract but that the concrete
    /// clinical model does not implement. Signals an unhonored subclass
    /// contract and should be caught at construction/testing time.
    UnsupportedColumn { model: &'static str, name: &'static str },

    /// A transform suffix (`"col:transform"`) that is not in the registry.
    InvalidTransform { name: String },

    /// A date-indexed transform was requested on a model with no start date.
    MissingStartDate,

    /// An operation that observes a model's simulation table was attempted
    /// before the model was initialized (clinical overlays cannot trigger
    /// initialization through their shared borrow).
    Uninitialized { model: String },

    /// A row index outside the simulated range.
    IndexOutOfRange { index: usize, len: usize },

    /// A transform produced a scalar, but the query also asked for a row
    /// restriction (or vice versa: an index was applied where no series
    /// remains to index).
    NotASeries { transform: &'static str },
}

impl std::error::Error for EpiError {}

impl std::fmt::Display for EpiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpiError::Param(err) => write!(f, "{err}"),
            EpiError::UnknownColumn { name } => write!(f, "invalid column: {name:?}"),
            EpiError::UnsupportedColumn { model, name } => {
                write!(f, "column {name:?} is not implemented by {model}")
            }
            EpiError::InvalidTransform { name } => write!(f, "invalid transform: {name:?}"),
            EpiError::MissingStartDate => {
                write!(f, "model has no start date; set one to use date-indexed transforms")
            }
            EpiError::Uninitialized { model } => {
                write!(f, "{model} is not initialized; call ensure_initialized or run first")
            }
            EpiError::IndexOutOfRange { index, len } => {
                write!(f, "row index {index} out of range for table of length {len}")
            }
            EpiError::NotASeries { transform } => {
                write!(f, "transform {transform:?} does not produce an indexable series")
            }
        }
    }
}

impl From<ParamError> for EpiError {
    fn from(err: ParamError) -> Self {
        EpiError::Param(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover Display formatting of representative variants and the
    // ParamError -> EpiError conversion. Behavior that *produces* the errors is
    // tested where it lives (params, query, clinical modules).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Display output names the parameter and the violated precondition so
    // failures are actionable without a debugger.
    fn param_error_display_names_the_offender() {
        let err = ParamError::InvalidParameter {
            name: "R0",
            value: 0.9,
            reason: "must be greater than one",
        };

        let msg = err.to_string();

        assert!(msg.contains("R0"));
        assert!(msg.contains("0.9"));
        assert!(msg.contains("greater than one"));
    }

    #[test]
    // Purpose
    // -------
    // Parameter failures propagate through model-level results via From.
    fn param_error_converts_into_epi_error() {
        let err = ParamError::MissingParameter { name: "gamma" };

        let epi: EpiError = err.clone().into();

        assert_eq!(epi, EpiError::Param(err));
    }
}
