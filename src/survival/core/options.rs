//! Fitter options — estimation-time configuration for the Generalized Gamma
//! model.
//!
//! Purpose
//! -------
//! Bundle the knobs that shape one fit: the optimizer configuration, an
//! optional user-supplied starting point that overrides the data-driven
//! heuristic, and the significance level used when reporting the
//! likelihood-ratio test against the exponential reference model.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`MLEOptions`] is validated by its own constructor; no cross-field
//!   checks happen here.
//! - `alpha` lies strictly inside `(0, 1)`.
//! - A user starting point is taken as is; non-finite coordinates are
//!   rejected later, when the fitter validates θ₀.
use crate::{
    optimization::loglik_optimizer::MLEOptions,
    survival::{
        core::params::GGParams,
        errors::{SurvivalError, SurvivalResult},
    },
};

/// Default significance level for the reference-model test.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// FitterOptions — estimation-time configuration.
///
/// Fields
/// ------
/// - `mle_opts`: [`MLEOptions`] for the L-BFGS backend.
/// - `initial_point`: `Option<GGParams>`; `None` uses the censoring-aware
///   heuristic.
/// - `alpha`: significance level for
///   [`LikelihoodRatioTest::rejects_reference`](crate::survival::models::LikelihoodRatioTest).
#[derive(Debug, Clone, PartialEq)]
pub struct FitterOptions {
    pub mle_opts: MLEOptions,
    pub initial_point: Option<GGParams>,
    pub alpha: f64,
}

impl FitterOptions {
    /// Errors
    /// ------
    /// - `InvalidAlpha` if `alpha ∉ (0, 1)`.
    pub fn new(
        mle_opts: MLEOptions, initial_point: Option<GGParams>, alpha: f64,
    ) -> SurvivalResult<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(SurvivalError::InvalidAlpha { value: alpha });
        }
        Ok(FitterOptions { mle_opts, initial_point, alpha })
    }
}

impl Default for FitterOptions {
    fn default() -> Self {
        FitterOptions { mle_opts: MLEOptions::default(), initial_point: None, alpha: DEFAULT_ALPHA }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `new` keeps its inputs and rejects significance levels outside (0, 1).
    fn new_validates_alpha() {
        let start = Some(GGParams::new(1.0, 0.0, 0.5));
        let opts = FitterOptions::new(MLEOptions::default(), start, 0.01).unwrap();
        assert_eq!(opts.initial_point, start);
        assert_eq!(opts.alpha, 0.01);

        for &alpha in &[0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                FitterOptions::new(MLEOptions::default(), None, alpha),
                Err(SurvivalError::InvalidAlpha { .. })
            ));
        }
        assert_eq!(FitterOptions::default().alpha, DEFAULT_ALPHA);
    }
}
