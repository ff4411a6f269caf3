//! models — fitted survival models.
//!
//! [`KnownParametricModel`] is the parameter/evaluator contract shared by
//! the censored likelihood; [`GeneralizedGammaFitter`] implements it and
//! owns the fit lifecycle.

pub mod generalized_gamma;
pub mod known_model;

pub use self::generalized_gamma::{GeneralizedGammaFitter, LikelihoodRatioTest};
pub use self::known_model::KnownParametricModel;
