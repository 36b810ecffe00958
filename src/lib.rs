//! epidemics — compartmental epidemic simulation and clinical projection.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the simulation stack to Python via the `_epidemics` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing classes and the module initializer used by the
//! `epidemics` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules ([`compartmental`], [`clinical`],
//!   [`region`], [`disease`]) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_epidemics` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input validation, and error mapping.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - External users interact with either the safe Rust APIs or the Python
//!   wrappers; the PyO3 plumbing is considered internal.

pub mod clinical;
pub mod compartmental;
pub mod disease;
pub mod region;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

#[cfg(feature = "python-bindings")]
use crate::{
    clinical::{
        ClinicalModel, ClinicalParams, CrudeFr, HospitalizationWithDelay,
        HospitalizationWithOverflow,
    },
    compartmental::{
        core::{formulas, ModelFamily},
        errors::EpiError,
        models::EpiModel,
        ColumnValue, TimeIndex,
    },
};

#[cfg(feature = "python-bindings")]
impl From<EpiError> for PyErr {
    fn from(err: EpiError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
fn parse_family(name: &str) -> PyResult<ModelFamily> {
    match name {
        "SIR" | "sir" => Ok(ModelFamily::Sir),
        "SEIR" | "seir" => Ok(ModelFamily::Seir),
        "SEAIR" | "seair" => Ok(ModelFamily::Seair),
        other => Err(PyValueError::new_err(format!("unknown model family: {other:?}"))),
    }
}

#[cfg(feature = "python-bindings")]
fn column_to_py(py: Python<'_>, value: ColumnValue) -> PyObject {
    match value {
        ColumnValue::Scalar(v) => v.into_py(py),
        ColumnValue::Date(d) => d.to_string().into_py(py),
        ColumnValue::Series(series) => {
            let values: Vec<f64> = series.values.to_vec();
            match series.index {
                TimeIndex::Days(days) => (days, values).into_py(py),
                TimeIndex::Dates(dates) => {
                    let dates: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
                    (dates, values).into_py(py)
                }
            }
        }
    }
}

/// Model — Python-facing wrapper for compartmental epidemic models.
///
/// Construct with a family name (`"sir"`, `"seir"`, `"seair"`, or
/// `"esir"` for the linearized SIR), optionally overriding parameters,
/// population, and the case-count seed. `run(days)` advances the simulation;
/// `get("column:transform")` answers the same query language as the Rust
/// API, returning `(index, values)` pairs for series and plain floats for
/// scalars.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "epidemics", unsendable)]
pub struct Model {
    pub inner: EpiModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Model {
    #[new]
    #[pyo3(
        signature = (family="sir", population=None, cases=None, **params),
        text_signature = "(family='sir', /, population=None, cases=None, **params)"
    )]
    fn new(
        family: &str,
        population: Option<f64>,
        cases: Option<f64>,
        params: Option<&Bound<'_, pyo3::types::PyDict>>,
    ) -> PyResult<Self> {
        let mut inner = match family {
            "esir" | "eSIR" => EpiModel::esir(),
            other => match parse_family(other)? {
                ModelFamily::Sir => EpiModel::sir(),
                ModelFamily::Seir => EpiModel::seir(),
                ModelFamily::Seair => EpiModel::seair(),
            },
        };
        if let Some(population) = population {
            inner = inner.with_population(population);
        }
        if let Some(cases) = cases {
            inner = inner.with_cases(cases);
        }
        if let Some(params) = params {
            for (key, value) in params.iter() {
                let name: String = key.extract()?;
                let value: f64 = value.extract()?;
                inner.set_param(&name, value).map_err(PyErr::from)?;
            }
        }
        Ok(Model { inner })
    }

    /// Advance the simulation by `days` unit steps.
    fn run(&mut self, days: u32) -> PyResult<()> {
        self.inner.run(days).map_err(PyErr::from)
    }

    /// Query a column, e.g. `get("cases")` or `get("infectious:p100k")`.
    fn get(&mut self, py: Python<'_>, spec: &str) -> PyResult<PyObject> {
        let value = self.inner.get(spec).map_err(PyErr::from)?;
        Ok(column_to_py(py, value))
    }

    /// Set a parameter by name (aliases resolve; derived parameters
    /// back-solve their primary).
    fn set_param(&mut self, name: &str, value: f64) -> PyResult<()> {
        self.inner.set_param(name, value).map_err(PyErr::from)
    }

    /// Query a clinical overlay without keeping it alive across calls.
    ///
    /// `kind` is one of `"crude"`, `"delay"`, `"overflow"`.
    #[pyo3(signature = (kind, spec, hospital_capacity=None, icu_capacity=None))]
    fn clinical(
        &mut self,
        py: Python<'_>,
        kind: &str,
        spec: &str,
        hospital_capacity: Option<f64>,
        icu_capacity: Option<f64>,
    ) -> PyResult<PyObject> {
        self.inner.ensure_initialized().map_err(PyErr::from)?;
        let mut params = ClinicalParams::default();
        if let (Some(h), Some(i)) = (hospital_capacity, icu_capacity) {
            params = params.with_capacities(h, i);
        }
        let value = match kind {
            "crude" => CrudeFr::new(&self.inner, params)
                .and_then(|m| m.get(spec))
                .map_err(PyErr::from)?,
            "delay" => HospitalizationWithDelay::new(&self.inner, params)
                .and_then(|m| m.get(spec))
                .map_err(PyErr::from)?,
            "overflow" => HospitalizationWithOverflow::new(&self.inner, params)
                .and_then(|m| m.get(spec))
                .map_err(PyErr::from)?,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown clinical model kind: {other:?}"
                )))
            }
        };
        Ok(column_to_py(py, value))
    }

    /// Current simulation time in days.
    #[getter]
    fn time(&self) -> f64 {
        self.inner.time()
    }

    /// The model family name.
    #[getter]
    fn family(&self) -> &'static str {
        self.inner.family().name()
    }
}

/// Early-epidemic growth rate `K` from `R0` for the given family.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (family, r0, gamma, sigma=None))]
fn growth_factor(family: &str, r0: f64, gamma: f64, sigma: Option<f64>) -> PyResult<f64> {
    Ok(match parse_family(family)? {
        ModelFamily::Sir => formulas::sir::k(r0, gamma),
        ModelFamily::Seir | ModelFamily::Seair => {
            let sigma = sigma
                .ok_or_else(|| PyValueError::new_err("sigma is required for the SEIR family"))?;
            formulas::seir::k(r0, gamma, sigma)
        }
    })
}

/// `R0` back-calculated from the growth rate `K` for the given family.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (family, k, gamma, sigma=None))]
fn r0_from_k(family: &str, k: f64, gamma: f64, sigma: Option<f64>) -> PyResult<f64> {
    Ok(match parse_family(family)? {
        ModelFamily::Sir => formulas::sir::r0_from_k(k, gamma),
        ModelFamily::Seir | ModelFamily::Seair => {
            let sigma = sigma
                .ok_or_else(|| PyValueError::new_err("sigma is required for the SEIR family"))?;
            formulas::seir::r0_from_k(k, gamma, sigma)
        }
    })
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _epidemics(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Model>()?;
    m.add_function(wrap_pyfunction!(growth_factor, m)?)?;
    m.add_function(wrap_pyfunction!(r0_from_k, m)?)?;
    Ok(())
}
