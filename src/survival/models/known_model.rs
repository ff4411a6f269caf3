//! Known-form parametric survival model interface.
//!
//! A univariate parametric survival model whose functional form is known up
//! to a finite parameter vector plugs into the generic machinery (censored
//! log-likelihood, fitting, reference-model tests) by describing:
//!
//! - its parameter layout: names, structural bounds, and a reference vector
//!   identifying a nested sub-model;
//! - a data-driven starting point;
//! - four functions of `(θ, times)`: survival, cumulative hazard,
//!   log-hazard, and `ln(1 − S)`.
//!
//! Everything else (hazard, density, cumulative distribution) is derived by
//! the provided methods. All functions take the raw optimizer vector `θ` and
//! fail only on structural problems (wrong length); numerical domain issues
//! surface as `NaN` in the returned arrays.
use crate::{
    optimization::loglik_optimizer::Theta,
    survival::{core::data::CensoredTimes, errors::ParamResult},
};
use ndarray::{Array1, ArrayView1};

pub trait KnownParametricModel {
    // ---- Parameter contract ----
    fn fitted_parameter_names(&self) -> &'static [&'static str];
    fn bounds(&self) -> &'static [(f64, f64)];
    fn reference_vector(&self) -> Theta;
    fn initial_point(&self, times: &CensoredTimes) -> Theta;

    // ---- Required evaluators ----
    fn survival_function(&self, theta: ArrayView1<f64>, times: ArrayView1<f64>)
    -> ParamResult<Array1<f64>>;
    fn cumulative_hazard(&self, theta: ArrayView1<f64>, times: ArrayView1<f64>)
    -> ParamResult<Array1<f64>>;
    fn log_hazard(&self, theta: ArrayView1<f64>, times: ArrayView1<f64>)
    -> ParamResult<Array1<f64>>;
    fn log_complement_survival(
        &self, theta: ArrayView1<f64>, times: ArrayView1<f64>,
    ) -> ParamResult<Array1<f64>>;

    // ---- Provided ----
    fn n_params(&self) -> usize {
        self.fitted_parameter_names().len()
    }

    fn hazard(&self, theta: ArrayView1<f64>, times: ArrayView1<f64>) -> ParamResult<Array1<f64>> {
        Ok(self.log_hazard(theta, times)?.mapv(f64::exp))
    }

    /// `F(t) = 1 − S(t)`, via the log-complement for precision near 0.
    fn cumulative_density(
        &self, theta: ArrayView1<f64>, times: ArrayView1<f64>,
    ) -> ParamResult<Array1<f64>> {
        Ok(self.log_complement_survival(theta, times)?.mapv(f64::exp))
    }

    /// `ln f(t) = ln h(t) − H(t)`.
    fn log_density(
        &self, theta: ArrayView1<f64>, times: ArrayView1<f64>,
    ) -> ParamResult<Array1<f64>> {
        let log_h = self.log_hazard(theta, times)?;
        let cum_haz = self.cumulative_hazard(theta, times)?;
        Ok(log_h - cum_haz)
    }

    fn density(&self, theta: ArrayView1<f64>, times: ArrayView1<f64>) -> ParamResult<Array1<f64>> {
        Ok(self.log_density(theta, times)?.mapv(f64::exp))
    }
}
