//! Errors for the Generalized Gamma survival model (data shape checks,
//! query validation, fitting failures, and reference tests).
//!
//! This module defines a model error type, [`SurvivalError`], and a parameter
//! error type, [`ParamError`], used across the Rust core and the optional
//! Python-facing API. Both implement `Display`/`Error` and, with the
//! `python-bindings` feature, convert to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Observation values themselves are *not* validated: non-positive times
//!   evaluate to `NaN` in the kernels and surface as a non-finite
//!   log-likelihood during fitting.
//! - Optimizer/backend errors are normalized to
//!   [`SurvivalError::OptimizationFailed`] with a human-readable status.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};
use statrs::distribution::GammaError;

/// Crate-wide result alias for survival operations that may produce
/// [`SurvivalError`].
pub type SurvivalResult<T> = Result<T, SurvivalError>;

/// Result alias for parameter-vector handling that may produce [`ParamError`].
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified error type for survival modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum SurvivalError {
    // ---- Input/data shape ----
    /// No observations were supplied.
    EmptySeries,

    /// An auxiliary column does not match the number of observations.
    LengthMismatch { column: &'static str, expected: usize, actual: usize },

    /// Total observation weight must be finite and > 0.
    InvalidTotalWeight { value: f64 },

    // ---- Queries ----
    /// Percentile probabilities must lie strictly inside (0, 1).
    InvalidProbability { value: f64 },

    /// Percentiles are undefined for λ = 0 (k = 1/λ² diverges).
    ZeroShape,

    // ---- Meta / options validation ----
    /// Significance level must lie strictly inside (0, 1).
    InvalidAlpha { value: f64 },

    /// Parameter vector problems surfaced through the model API.
    InvalidParams(ParamError),

    // ---- Estimation / optimizer ----
    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,

    // ---- statrs distribution errors ----
    /// Wrapper for statrs::distribution::GammaError (chi-squared reference law).
    InvalidChiSquaredParam { reason: &'static str },
}

impl std::error::Error for SurvivalError {}

impl std::fmt::Display for SurvivalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data shape ----
            SurvivalError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            SurvivalError::LengthMismatch { column, expected, actual } => {
                write!(f, "Column '{column}' has length {actual}; expected {expected}.")
            }
            SurvivalError::InvalidTotalWeight { value } => {
                write!(f, "Total observation weight must be finite and > 0; got: {value}")
            }
            // ---- Queries ----
            SurvivalError::InvalidProbability { value } => {
                write!(f, "Probability must lie strictly between 0 and 1; got: {value}")
            }
            SurvivalError::ZeroShape => {
                write!(f, "Percentiles are undefined for lambda = 0.")
            }
            // ---- Meta / options validation ----
            SurvivalError::InvalidAlpha { value } => {
                write!(f, "Significance level must lie strictly between 0 and 1; got: {value}")
            }
            SurvivalError::InvalidParams(err) => {
                write!(f, "Invalid parameters: {err}")
            }
            // ---- Estimation / optimizer ----
            SurvivalError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
            SurvivalError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
            // ---- statrs distribution errors ----
            SurvivalError::InvalidChiSquaredParam { reason } => {
                write!(f, "Chi-squared reference distribution is invalid: {reason}")
            }
        }
    }
}

/// Convert a [`SurvivalError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<SurvivalError> for PyErr {
    fn from(err: SurvivalError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<GammaError> for SurvivalError {
    fn from(err: GammaError) -> SurvivalError {
        let reason = match err {
            GammaError::ShapeInvalid => "shape must be finite and > 0",
            GammaError::RateInvalid => "rate must be finite and > 0",
            _ => "shape and rate cannot both be infinite",
        };
        SurvivalError::InvalidChiSquaredParam { reason }
    }
}

impl From<ParamError> for SurvivalError {
    fn from(err: ParamError) -> SurvivalError {
        SurvivalError::InvalidParams(err)
    }
}

/// Errors specific to parameter-vector handling.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Theta length mismatch for GGParams.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput { index: usize, value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Theta input at index {index} must be finite, got {value}")
            }
        }
    }
}

/// Convert a [`ParamError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
