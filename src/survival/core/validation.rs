//! Parameter-vector validation for the optimizer boundary.
//!
//! The kernels themselves accept any `θ` and let invalid values propagate as
//! `NaN`. The checks here run once, before optimization starts, so that a
//! hopeless starting point (wrong length, `NaN`/`±∞` from degenerate data)
//! fails fast with a typed error instead of a line-search failure.
use crate::survival::{
    core::params::N_PARAMS,
    errors::{ParamError, ParamResult},
};
use ndarray::ArrayView1;

/// Validate an optimizer vector: length `N_PARAMS`, all entries finite.
///
/// Errors
/// ------
/// - `ThetaLengthMismatch` for a wrong length.
/// - `InvalidThetaInput { index, value }` for the first non-finite entry.
pub fn validate_theta(theta: ArrayView1<f64>) -> ParamResult<()> {
    if theta.len() != N_PARAMS {
        return Err(ParamError::ThetaLengthMismatch { expected: N_PARAMS, actual: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(ParamError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}
