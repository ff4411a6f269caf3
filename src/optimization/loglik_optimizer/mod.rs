//! loglik_optimizer — argmin-powered maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Callers implement [`LogLikelihood`] and call [`maximize`] to run L-BFGS
//! with a configurable line search, tolerances, and a finite-difference
//! gradient when no analytic one is available. The Generalized Gamma fitter
//! is the main client.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the cost `c(θ) = -ℓ(θ)`
//!   and supplies numeric gradients. Points where `ℓ` is not finite get a
//!   finite penalty cost so line searches back off instead of failing.
//! - [`maximize`] validates the initial guess with [`LogLikelihood::check`],
//!   builds the solver ([`builders`]), and runs it ([`run::run_lbfgs`]),
//!   restarting from the best point when a line search aborts a run.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters are unconstrained [`Theta`] vectors; any mapping to model
//!   parameters happens in the model layer.
//! - User-facing values, including [`OptimOutcome::value`], are in
//!   log-likelihood units. Only the adapter sees costs.
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult).

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{
    LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, RunEnd, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
