//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Combine an argmin-backed log-likelihood optimizer, overflow-safe
//! exponential/log helpers, and a single optimizer error type so that model
//! code can fit parameters without touching solver details.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: maximize `ℓ(θ)` with L-BFGS.
//! - `numerical_stability`: `safe_exp`, `log1m_exp`, and the shared
//!   overflow/underflow constants used by the survival kernels.
//! - `errors`: `OptError` / `OptResult<T>`, with conversions to and from
//!   the survival error types.
//!
//! Conventions
//! -----------
//! - Solvers minimize `c(θ) = -ℓ(θ)` internally; outcomes are reported in
//!   log-likelihood units.
//! - Callers never see raw argmin errors.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
