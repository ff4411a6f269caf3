//! Initialization heuristic for the Generalized Gamma fit.
//!
//! Purpose
//! -------
//! Derive a starting point `θ₀ = (μ₀, ln σ₀, λ₀)` from the censored times,
//! reading the slice that best represents event times for the active
//! censoring variant.
//!
//! Key behaviors
//! -------------
//! - Right-censored: the durations.
//! - Left-censored: the durations (upper bounds).
//! - Interval-censored: the interval widths `upper − lower`.
//! - With `y = ln(data)`: `μ₀ = mean(y)`, `ln σ₀ = ln(std(y))` (population
//!   standard deviation), `λ₀ = 0.1`.
//!
//! Invariants & assumptions
//! ------------------------
//! - No validation: degenerate data propagate numerically. Constant data
//!   give `ln σ₀ = −∞`; an empty slice or non-positive values give `NaN`;
//!   interval rows with `lower == upper` contribute `ln 0 = −∞`. The fitter
//!   checks the resulting point before handing it to the optimizer.
//! - `λ₀ = 0.1` keeps the start away from the `λ = 0` singularity on the
//!   upper-tail side.
use crate::{
    optimization::loglik_optimizer::Theta,
    survival::core::{data::CensoredTimes, params::GGParams},
};
use ndarray::{Array1, ArrayView1};

/// Starting shape; positive and away from the λ = 0 boundary.
pub const INITIAL_LAMBDA: f64 = 0.1;

/// Heuristic starting point for the given censored times.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use rust_survival::survival::core::{CensoredTimes, initial_point};
/// let times = CensoredTimes::Right { durations: array![1.0, 2.0, 4.0, 8.0, 16.0] };
/// let theta0 = initial_point(&times);
/// assert!((theta0[0] - 4.0_f64.ln()).abs() < 1e-12);
/// assert_eq!(theta0[2], 0.1);
/// ```
pub fn initial_point(times: &CensoredTimes) -> Theta {
    let log_data: Array1<f64> = match times {
        CensoredTimes::Right { durations } | CensoredTimes::Left { durations } => {
            durations.mapv(f64::ln)
        }
        CensoredTimes::Interval { lower, upper } => (upper - lower).mapv(f64::ln),
    };
    let (mean, std) = mean_and_std(log_data.view());
    GGParams::new(mean, std.ln(), INITIAL_LAMBDA).to_theta()
}

/// Mean and population standard deviation; `NaN` for an empty slice.
fn mean_and_std(values: ArrayView1<f64>) -> (f64, f64) {
    match values.mean() {
        Some(mean) => (mean, values.std(0.0)),
        None => (f64::NAN, f64::NAN),
    }
}
