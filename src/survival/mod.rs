//! survival — Generalized Gamma survival regression without covariates.
//!
//! Purpose
//! -------
//! Fit the three-parameter Generalized Gamma distribution to censored
//! survival data by maximum likelihood and query the fitted model
//! (survival, cumulative hazard, hazard, percentiles, AIC, and a
//! likelihood-ratio test against the unit-exponential reference).
//!
//! Key behaviors
//! -------------
//! - `core`: parameters, data containers, evaluators, percentile, and the
//!   censored log-likelihood.
//! - `models`: the [`KnownParametricModel`] contract and
//!   [`GeneralizedGammaFitter`].
//! - `errors`: [`SurvivalError`] / [`ParamError`] and their result aliases.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::array;
//! use rust_survival::survival::prelude::*;
//!
//! let data = SurvivalData::right_censored(
//!     array![0.8, 1.1, 1.9, 2.4, 3.0, 3.3, 4.2, 5.5],
//!     Some(array![true, true, false, true, true, false, true, true]),
//! )
//! .unwrap();
//! let mut fitter = GeneralizedGammaFitter::default();
//! fitter.fit(&data).unwrap();
//! let median = fitter.median_survival_time().unwrap();
//! assert!(median > 0.0);
//! ```

pub mod core;
pub mod errors;
pub mod models;

pub use self::core::{CensoredTimes, FitterOptions, GGParams, SurvivalData};
pub use self::errors::{ParamError, ParamResult, SurvivalError, SurvivalResult};
pub use self::models::{GeneralizedGammaFitter, KnownParametricModel, LikelihoodRatioTest};

pub mod prelude {
    pub use super::{
        CensoredTimes, FitterOptions, GGParams, GeneralizedGammaFitter, KnownParametricModel,
        LikelihoodRatioTest, ParamError, ParamResult, SurvivalData, SurvivalError, SurvivalResult,
    };
}
