//! rust_survival — Generalized Gamma survival fitting with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the Generalized Gamma fitter to Python via the `_rust_survival`
//! extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: `special` (incomplete gamma functions
//!   and their inverses), `survival` (parameters, censored data, evaluators,
//!   likelihood, fitter), and `optimization` (argmin L-BFGS layer).
//! - With `python-bindings`, define the `GeneralizedGamma` `#[pyclass]` and
//!   the `#[pymodule]` initializer.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//!
//! Conventions
//! -----------
//! - Python-visible parameter names follow the model: `mu`, `ln_sigma`, and
//!   `lambda_` (trailing underscore because `lambda` is a Python keyword).
//! - Core errors are converted to `PyErr` (`ValueError`) at the boundary.

pub mod optimization;
pub mod special;
pub mod survival;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    survival::{core::SurvivalData, models::GeneralizedGammaFitter},
    utils::{extract_array1, extract_fitter_options, extract_survival_data},
};

/// GeneralizedGamma — Python-facing wrapper for [`GeneralizedGammaFitter`].
///
/// Constructed as `GeneralizedGamma(tol_grad=None, ..., alpha=None)`, then
/// fitted with one of the `fit_*_censoring` methods. Post-fit queries raise
/// `ValueError` until a fit has succeeded.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_survival")]
pub struct GeneralizedGamma {
    pub inner: GeneralizedGammaFitter,
}

#[cfg(feature = "python-bindings")]
impl GeneralizedGamma {
    fn fit_data(&mut self, data: &SurvivalData) -> PyResult<()> {
        self.inner.fit(data)?;
        Ok(())
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GeneralizedGamma {
    #[new]
    #[pyo3(
        signature = (
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
            verbose = false,
            initial_point = None,
            alpha = None,
        ),
        text_signature = "(tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, \
                          lbfgs_mem=None, verbose=False, initial_point=None, alpha=None)"
    )]
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: bool,
        initial_point: Option<(f64, f64, f64)>, alpha: Option<f64>,
    ) -> PyResult<Self> {
        let options = extract_fitter_options(
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            verbose,
            initial_point,
            alpha,
        )?;
        Ok(GeneralizedGamma { inner: GeneralizedGammaFitter::new(options) })
    }

    #[pyo3(
        signature = (durations, event_observed = None, weights = None, entry = None),
        text_signature = "(self, durations, /, event_observed=None, weights=None, entry=None)"
    )]
    pub fn fit_right_censoring<'py>(
        &mut self, py: Python<'py>, durations: &Bound<'py, PyAny>,
        event_observed: Option<&Bound<'py, PyAny>>, weights: Option<&Bound<'py, PyAny>>,
        entry: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let data =
            extract_survival_data(py, "right", durations, None, event_observed, weights, entry)?;
        self.fit_data(&data)
    }

    #[pyo3(
        signature = (durations, event_observed = None, weights = None, entry = None),
        text_signature = "(self, durations, /, event_observed=None, weights=None, entry=None)"
    )]
    pub fn fit_left_censoring<'py>(
        &mut self, py: Python<'py>, durations: &Bound<'py, PyAny>,
        event_observed: Option<&Bound<'py, PyAny>>, weights: Option<&Bound<'py, PyAny>>,
        entry: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let data =
            extract_survival_data(py, "left", durations, None, event_observed, weights, entry)?;
        self.fit_data(&data)
    }

    #[pyo3(
        signature = (lower_bound, upper_bound, event_observed = None, weights = None, entry = None),
        text_signature = "(self, lower_bound, upper_bound, /, event_observed=None, weights=None, \
                          entry=None)"
    )]
    pub fn fit_interval_censoring<'py>(
        &mut self, py: Python<'py>, lower_bound: &Bound<'py, PyAny>,
        upper_bound: &Bound<'py, PyAny>, event_observed: Option<&Bound<'py, PyAny>>,
        weights: Option<&Bound<'py, PyAny>>, entry: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let data = extract_survival_data(
            py,
            "interval",
            lower_bound,
            Some(upper_bound),
            event_observed,
            weights,
            entry,
        )?;
        self.fit_data(&data)
    }

    /// S(t) of the fitted model at each time.
    #[pyo3(text_signature = "(self, times, /)")]
    pub fn survival_function<'py>(
        &self, py: Python<'py>, times: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let times = extract_array1(py, times, "times")?;
        Ok(self.inner.survival_function_at(times.view())?.to_vec())
    }

    /// H(t) of the fitted model at each time.
    #[pyo3(text_signature = "(self, times, /)")]
    pub fn cumulative_hazard<'py>(
        &self, py: Python<'py>, times: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let times = extract_array1(py, times, "times")?;
        Ok(self.inner.cumulative_hazard_at(times.view())?.to_vec())
    }

    /// h(t) of the fitted model at each time.
    #[pyo3(text_signature = "(self, times, /)")]
    pub fn hazard<'py>(&self, py: Python<'py>, times: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let times = extract_array1(py, times, "times")?;
        Ok(self.inner.hazard_at(times.view())?.to_vec())
    }

    /// Time at which the fitted survival function equals `p`.
    #[pyo3(text_signature = "(self, p, /)")]
    pub fn percentile(&self, p: f64) -> PyResult<f64> {
        Ok(self.inner.percentile(p)?)
    }

    #[getter]
    pub fn median_survival_time(&self) -> PyResult<f64> {
        Ok(self.inner.median_survival_time()?)
    }

    #[getter]
    pub fn mu(&self) -> PyResult<f64> {
        Ok(self.inner.params()?.mu)
    }

    #[getter]
    pub fn ln_sigma(&self) -> PyResult<f64> {
        Ok(self.inner.params()?.ln_sigma)
    }

    #[getter]
    pub fn lambda_(&self) -> PyResult<f64> {
        Ok(self.inner.params()?.lambda)
    }

    /// Total weighted log-likelihood at the optimum.
    #[getter]
    pub fn log_likelihood(&self) -> PyResult<f64> {
        Ok(self.inner.log_likelihood()?)
    }

    #[getter]
    pub fn aic(&self) -> PyResult<f64> {
        Ok(self.inner.aic()?)
    }

    #[getter]
    pub fn converged(&self) -> PyResult<bool> {
        match &self.inner.results {
            Some(outcome) => Ok(outcome.converged),
            None => Err(crate::survival::errors::SurvivalError::ModelNotFitted.into()),
        }
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_survival<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<GeneralizedGamma>()?;
    Ok(())
}
