//! core — Generalized Gamma parameters, censored data, and evaluators.
//!
//! Purpose
//! -------
//! Collect the building blocks of the Generalized Gamma survival model:
//! the `(μ, ln σ, λ)` parameter container, censored-data containers, the
//! closed-form survival/hazard evaluators, percentiles, the starting-point
//! heuristic, and the censored log-likelihood used by the fitter.
//!
//! Key behaviors
//! -------------
//! - [`GGParams`] maps between the optimizer vector and named parameters.
//! - [`CensoredTimes`] / [`SurvivalData`] hold right-, left-, or
//!   interval-censored observations with event flags, weights, and optional
//!   entry times, validated on construction.
//! - [`kernels`] evaluates `S`, `H`, `ln h`, and `ln(1 - S)` through the
//!   regularized incomplete gamma functions, switching tails on the sign of
//!   `λ`.
//! - [`percentile`] inverts the survival function.
//! - [`log_likelihood`] is the weighted mean log-likelihood over all rows.
//!
//! Invariants & assumptions
//! ------------------------
//! - All parameters live in unconstrained space; `σ = exp(ln σ)` is always
//!   positive and `λ` carries sign.
//! - `λ = 0` (the log-normal limit) is not evaluated: kernels return `NaN`
//!   and percentiles error.
//! - Non-positive times produce `NaN` rather than an error.

pub mod data;
pub mod init;
pub mod kernels;
pub mod likelihood;
pub mod options;
pub mod params;
pub mod percentile;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{CensoredTimes, SurvivalData};
pub use self::init::{INITIAL_LAMBDA, initial_point};
pub use self::kernels::{
    Regime, cumulative_hazard, log_complement_survival, log_hazard, survival_function,
};
pub use self::likelihood::log_likelihood;
pub use self::options::{DEFAULT_ALPHA, FitterOptions};
pub use self::params::{BOUNDS, GGParams, N_PARAMS, PARAM_NAMES, REFERENCE_PARAMS};
pub use self::percentile::percentile;
pub use self::validation::validate_theta;
