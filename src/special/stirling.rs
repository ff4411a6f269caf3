//! Remainder of Stirling's approximation to `ln Γ`.
//!
//! `ln Γ(a) = (a − ½) ln a − a + ½ ln 2π + δ(a)`. Large-shape formulas
//! (incomplete gamma prefactors, the Generalized Gamma density as `λ → 0`)
//! combine `ln Γ(a)` with `a ln a` terms of similar magnitude; writing them in
//! terms of `δ(a)` lets those terms cancel analytically instead of in
//! floating point.
use statrs::function::gamma::ln_gamma;

/// From here on `δ(a)` is summed from its asymptotic series.
pub const STIRLING_SERIES_FROM: f64 = 10.0;

/// `½ ln 2π`.
const HALF_LN_TWO_PI: f64 = 0.918_938_533_204_672_8;

/// Stirling remainder `δ(a) = ln Γ(a) − [(a − ½) ln a − a + ½ ln 2π]`.
///
/// For `a ≥ 10` the series `1/(12a) − 1/(360a³) + 1/(1260a⁵) − 1/(1680a⁷)
/// + 1/(1188a⁹)` is accurate to about `1e−14`; below that the definition is
/// evaluated directly. `a ≤ 0` and `NaN` give `NaN`; `δ(∞) = 0`.
///
/// # Examples
/// ```
/// use rust_survival::special::stirling_remainder;
/// // δ(1) = 1 − ½ ln 2π.
/// assert!((stirling_remainder(1.0) - 0.081_061_466_795_327_26).abs() < 1e-14);
/// ```
pub fn stirling_remainder(a: f64) -> f64 {
    if !(a > 0.0) {
        return f64::NAN;
    }
    if a < STIRLING_SERIES_FROM {
        return ln_gamma(a) - ((a - 0.5) * a.ln() - a + HALF_LN_TWO_PI);
    }
    let r = 1.0 / a;
    let r2 = r * r;
    r * (1.0 / 12.0
        + r2 * (-1.0 / 360.0 + r2 * (1.0 / 1260.0 + r2 * (-1.0 / 1680.0 + r2 / 1188.0))))
}
