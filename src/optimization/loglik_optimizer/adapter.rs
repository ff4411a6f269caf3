//! Bridge from a [`LogLikelihood`] to argmin's `CostFunction` / `Gradient`.
//!
//! argmin minimizes, so the adapter reports `c(θ) = -ℓ(θ)` and `-∇ℓ(θ)`.
//! When the model has no analytic gradient the cost is differentiated
//! numerically with `finitediff`: central differences first, forward
//! differences if the central stencil hits an error or yields a non-finite
//! component (e.g. a trial step leaves the region where the likelihood is
//! finite).
//!
//! Where `ℓ(θ)` is not finite the cost is `penalty` and the gradient is the
//! pseudo-gradient `θ − θ_last`, with `θ_last` the most recent point whose
//! gradient was finite (zero before any). A line search leaving `θ_last`
//! therefore sees the penalized region sloping upward and shrinks the step.
//! Penalized points never pass a sufficient-decrease test as long as
//! `penalty` exceeds the starting cost (see
//! [`ArgMinAdapter::with_penalty_above`]).
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;
use tracing::trace;

/// Cost reported where `ℓ(θ)` is not finite, before a start is known.
pub const NON_FINITE_COST_PENALTY: Cost = 1e10;

/// Plateau height relative to `|cost0| + 1` once a start is known.
const PENALTY_SCALE: Cost = 1e3;

/// Borrowing view of a model and its data in argmin's minimization form.
#[derive(Debug)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub penalty: Cost,
    last_finite: RefCell<Option<Theta>>,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, penalty: NON_FINITE_COST_PENALTY, last_finite: RefCell::new(None) }
    }

    /// Place the plateau at `PENALTY_SCALE · (|cost0| + 1)`, strictly above
    /// the cost at the starting point.
    pub fn with_penalty_above(mut self, cost0: Cost) -> Self {
        self.penalty = PENALTY_SCALE * (cost0.abs() + 1.0);
        self
    }

    /// `-ℓ(θ)`, or `NonFiniteCost` when `ℓ(θ)` is not finite.
    pub fn checked_cost(&self, theta: &Theta) -> OptResult<Cost> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok(-value)
    }

    fn penalty_gradient(&self, theta: &Theta) -> Grad {
        match self.last_finite.borrow().as_ref() {
            Some(last) if last.len() == theta.len() => theta - last,
            _ => Grad::zeros(theta.len()),
        }
    }

    fn finite_diff_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let dim = theta.len();
        // First error raised while probing; the stencil itself only sees NaN.
        let trial_err: RefCell<Option<OptError>> = RefCell::new(None);
        let cost_func = |theta: &Theta| -> f64 {
            match self.checked_cost(theta) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = trial_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };

        let central = theta.central_diff(&cost_func);
        if trial_err.borrow().is_none() && validate_grad(&central, dim).is_ok() {
            return Ok(central);
        }

        trial_err.replace(None);
        let forward = theta.forward_diff(&cost_func);
        if let Some(err) = trial_err.take() {
            return Err(err.into());
        }
        validate_grad(&forward, dim)?;
        Ok(forward)
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        match self.checked_cost(theta) {
            Ok(cost) => Ok(cost),
            Err(OptError::NonFiniteCost { value }) => {
                trace!(value, penalty = self.penalty, "non-finite log-likelihood at trial point");
                Ok(self.penalty)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.checked_cost(theta) {
            Ok(_) => {}
            Err(OptError::NonFiniteCost { .. }) => return Ok(self.penalty_gradient(theta)),
            Err(e) => return Err(e.into()),
        }
        let grad = match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                -g
            }
            Err(OptError::GradientNotImplemented) => self.finite_diff_gradient(theta)?,
            Err(e) => return Err(e.into()),
        };
        self.last_finite.replace(Some(theta.clone()));
        Ok(grad)
    }
}
