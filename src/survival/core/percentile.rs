//! Quantile inversion of the survival function.
//!
//! `percentile(params, p)` returns the time `t` at which `S(t) = p`:
//!
//! `t = exp(σ · ln(Inv(k, p) · λ²) / λ + μ)`,
//!
//! where `Inv` is the inverse of the *survival* tail of the active regime:
//! `Q⁻¹` for `λ > 0` and `P⁻¹` for `λ < 0`. Passing the survival
//! probability straight to the matching inverse keeps tiny `p` accurate
//! (no `1 − p` rounding).
//!
//! `λ = 0` has no percentile in this parameterization and `p` must lie in
//! the open interval `(0, 1)`; both are rejected with typed errors before
//! any numerics run.
use crate::{
    special::{inv_gamma_lr, inv_gamma_ur},
    survival::{
        core::{kernels::Regime, params::GGParams},
        errors::{SurvivalError, SurvivalResult},
    },
};

/// Time at which the survival function equals `p`.
///
/// Errors
/// ------
/// - `InvalidProbability` if `p ∉ (0, 1)` (including `NaN`).
/// - `ZeroShape` if `λ == 0`.
///
/// # Examples
/// ```
/// use rust_survival::survival::core::{GGParams, percentile};
/// // Unit exponential: S(t) = e^{-t}, so the median is ln 2.
/// let t = percentile(&GGParams::new(0.0, 0.0, 1.0), 0.5).unwrap();
/// assert!((t - 2.0_f64.ln()).abs() < 1e-12);
/// ```
pub fn percentile(params: &GGParams, p: f64) -> SurvivalResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(SurvivalError::InvalidProbability { value: p });
    }
    let lambda = params.lambda;
    if lambda == 0.0 {
        return Err(SurvivalError::ZeroShape);
    }
    let k = params.shape();
    let x = match Regime::of(lambda) {
        Regime::UpperTail => inv_gamma_ur(k, p),
        Regime::LowerTail => inv_gamma_lr(k, p),
    };
    Ok((params.sigma() * (x * lambda * lambda).ln() / lambda + params.mu).exp())
}
