//! numerical_stability — overflow-guarded scalar transforms.
//!
//! Purpose
//! -------
//! Collect the small, numerically guarded scalar helpers shared by the
//! survival kernels and the censored log-likelihood, so that every
//! evaluator clamps exponentials the same way and no module re-invents its
//! own thresholds.
//!
//! Key behaviors
//! -------------
//! - Provide the bounded exponential [`safe_exp`] used for every
//!   `exp(λZ − 2 ln|λ|)` and `exp(λZ)` evaluation in the Generalized Gamma
//!   kernels.
//! - Provide [`log1m_exp`] for `ln(1 − eˣ)`, needed to turn two cumulative
//!   hazards into the log-mass of an interval.
//! - Provide [`log1pmx`] and [`expm1mx`] for the small-argument differences
//!   that dominate the Generalized Gamma kernels as `λ → 0`.
//! - Centralize the tolerances ([`MAX_SAFE_EXP_ARG`], [`LOG_PROB_FLOOR`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All helpers are pure functions of their `f64` inputs; no global or
//!   mutable state is involved.
//! - `NaN` inputs propagate as `NaN`; the clamp only acts on large finite
//!   or `+∞` exponents.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   safe to call from tight inner loops and from several threads at once.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas on
//!   safe grids, clamping, tail precision, and NaN propagation.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    LOG_PROB_FLOOR, MAX_SAFE_EXP_ARG, expm1mx, log1m_exp, log1pmx, safe_exp,
};

pub mod prelude {
    pub use super::transformations::{
        LOG_PROB_FLOOR, MAX_SAFE_EXP_ARG, expm1mx, log1m_exp, log1pmx, safe_exp,
    };
}
