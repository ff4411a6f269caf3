//! utils — Python → Rust conversion helpers for the PyO3 bindings.
//!
//! Purpose
//! -------
//! Convert Python array-likes and keyword arguments into the validated Rust
//! containers used by the survival fitter ([`SurvivalData`],
//! [`FitterOptions`]). Everything here is compiled only with the
//! `python-bindings` feature.
//!
//! Conventions
//! -----------
//! - Array inputs may be NumPy arrays, pandas Series (via `to_numpy`), or
//!   plain Python sequences of floats.
//! - Event indicators arrive as numbers or booleans; any non-zero value is an
//!   observed event.
//! - Core errors are converted to `PyErr` through their `From` impls.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    survival::core::{CensoredTimes, DEFAULT_ALPHA, FitterOptions, GGParams, SurvivalData},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Borrow a contiguous read-only `float64` view of `raw_data`, copying only
/// when the input is not already a contiguous NumPy array.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned copy of a 1-D float array; `name` is used in the error message.
#[cfg(feature = "python-bindings")]
pub fn extract_array1<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

#[cfg(feature = "python-bindings")]
fn extract_optional<'py>(
    py: Python<'py>, raw_data: Option<&Bound<'py, PyAny>>, name: &str,
) -> PyResult<Option<Array1<f64>>> {
    raw_data.map(|obj| extract_array1(py, obj, name)).transpose()
}

/// Build [`SurvivalData`] from Python arguments.
///
/// `kind` selects the variant (`"right"`, `"left"`, `"interval"`). `first`
/// holds the durations, or the lower bounds when `kind == "interval"`, in
/// which case `upper` is required.
#[cfg(feature = "python-bindings")]
pub fn extract_survival_data<'py>(
    py: Python<'py>, kind: &str, first: &Bound<'py, PyAny>, upper: Option<&Bound<'py, PyAny>>,
    event_observed: Option<&Bound<'py, PyAny>>, weights: Option<&Bound<'py, PyAny>>,
    entry: Option<&Bound<'py, PyAny>>,
) -> PyResult<SurvivalData> {
    let times = match (kind, upper) {
        ("right", _) => CensoredTimes::Right { durations: extract_array1(py, first, "durations")? },
        ("left", _) => CensoredTimes::Left { durations: extract_array1(py, first, "durations")? },
        ("interval", Some(upper)) => CensoredTimes::Interval {
            lower: extract_array1(py, first, "lower_bound")?,
            upper: extract_array1(py, upper, "upper_bound")?,
        },
        ("interval", None) => {
            return Err(PyValueError::new_err("upper_bound is required for interval censoring"));
        }
        (other, _) => {
            return Err(PyValueError::new_err(format!(
                "invalid censoring kind {other:?} (expected 'right', 'left', or 'interval')"
            )));
        }
    };
    let events = extract_optional(py, event_observed, "event_observed")?
        .map(|flags| flags.mapv(|v| v != 0.0));
    let weights = extract_optional(py, weights, "weights")?;
    let entry = extract_optional(py, entry, "entry")?;
    Ok(SurvivalData::new(times, events, weights, entry)?)
}

/// Build [`FitterOptions`] from optimizer keywords, an optional starting
/// point `(mu, ln_sigma, lambda)`, and the test level `alpha`.
#[cfg(feature = "python-bindings")]
pub fn extract_fitter_options(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: bool,
    initial_point: Option<(f64, f64, f64)>, alpha: Option<f64>,
) -> PyResult<FitterOptions> {
    let defaults = MLEOptions::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter)?
    };
    let line_searcher = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => defaults.line_searcher,
    };
    let mle_opts = MLEOptions::new(tols, line_searcher, verbose, lbfgs_mem)?;
    let initial_point = initial_point
        .map(|(mu, ln_sigma, lambda)| GGParams::new(mu, ln_sigma, lambda));
    let alpha = alpha.unwrap_or(DEFAULT_ALPHA);
    Ok(FitterOptions::new(mle_opts, initial_point, alpha)?)
}
