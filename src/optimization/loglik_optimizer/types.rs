//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Name the numeric shapes the optimizer traffics in once, so the model
//! layer (`GGParams::to_theta`, the censored likelihood) and the argmin glue
//! agree without repeating `ndarray`/argmin generics.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Theta` and `Grad` have one entry per free model parameter (three for
//!   the Generalized Gamma model).
//! - `Cost` is a scalar `f64`; the adapter owns the sign flip between cost
//!   and log-likelihood.
//! - The line-search aliases assume argmin's three-parameter forms
//!   `(Param, Gradient, Float)` as of the pinned argmin version.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector.
pub type Theta = Array1<f64>;

/// Gradient with respect to [`Theta`].
pub type Grad = Array1<f64>;

pub type Cost = f64;

/// argmin function-evaluation counters (e.g. `cost_count`, `gradient_count`).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length used when `MLEOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
