//! Numerical stability utilities.
//!
//! Provides guarded versions of the exponential and of `ln(1 - e^x)`, the two
//! scalar transforms the survival kernels and the censored likelihood lean on.
//! Naïve `f64::exp` overflows to `+∞` for arguments above ~709.78; once an
//! `∞` reaches an incomplete-gamma evaluation it turns into `NaN` and the
//! optimizer loses the whole line search. The helpers here keep `f64`
//! arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`MAX_SAFE_EXP_ARG`]: the largest exponent passed to `exp`,
//!   `ln(f64::MAX) - 75 ≈ 634.78`.
//! - [`safe_exp(x)`]: `exp(min(x, MAX_SAFE_EXP_ARG))`, preserving `NaN`.
//! - [`log1m_exp(x)`]: stable `ln(1 - exp(x))` for `x ≤ 0`.
//! - [`log1pmx(x)`]: `ln(1 + x) - x` without cancellation near `0`.
//! - [`expm1mx(x)`]: `exp(x) - 1 - x` without cancellation near `0`,
//!   exponent clamped as in [`safe_exp`].
//! - [`LOG_PROB_FLOOR`]: floor used when a log-probability would be `-∞`.

/// Largest argument handed to `f64::exp` by [`safe_exp`].
///
/// `ln(f64::MAX) ≈ 709.78`; the extra 75 nats of headroom leave room for a
/// few multiplications by moderate factors before anything overflows.
pub const MAX_SAFE_EXP_ARG: f64 = 634.782_712_893_384;

/// Floor for per-observation log-probabilities in censored likelihood terms.
///
/// Matches `ln(1e-25)`; interval-censored contributions whose probability
/// mass underflows are clipped here instead of contributing `-∞`.
pub const LOG_PROB_FLOOR: f64 = -57.564_627_324_851_14;

/// Bounded exponential: `exp(x)` with the exponent clamped from above.
///
/// - For `x > MAX_SAFE_EXP_ARG`, returns `exp(MAX_SAFE_EXP_ARG)` (finite).
/// - For every other input, including `-∞` (→ `0.0`) and `NaN`
///   (→ `NaN`), it is plain `x.exp()`.
///
/// The comparison is written so that `NaN` falls through to `exp`;
/// `f64::min` would silently replace a `NaN` exponent by the bound.
///
/// # Parameters
/// - `x`: real exponent.
///
/// # Returns
/// - `exp(x)` clamped to at most `exp(MAX_SAFE_EXP_ARG)`.
#[inline]
pub fn safe_exp(x: f64) -> f64 {
    if x > MAX_SAFE_EXP_ARG { MAX_SAFE_EXP_ARG.exp() } else { x.exp() }
}

/// Stable `ln(1 - exp(x))` for `x ≤ 0`.
///
/// Uses the two-regime split of Mächler (2012):
///
/// - For `x > -ln 2`, `1 - exp(x)` is small, so `ln(-expm1(x))` keeps full
///   precision.
/// - Otherwise `exp(x) ≤ 1/2` and `ln_1p(-exp(x))` is accurate.
///
/// Returns `-∞` at `x = 0`, `NaN` for `x > 0` or `NaN` input.
#[inline]
pub fn log1m_exp(x: f64) -> f64 {
    if x > 0.0 || x.is_nan() {
        f64::NAN
    } else if x > -std::f64::consts::LN_2 {
        (-x.exp_m1()).ln()
    } else {
        (-x.exp()).ln_1p()
    }
}

/// Below this magnitude [`log1pmx`] and [`expm1mx`] sum their Taylor series.
const SERIES_CUTOFF: f64 = 0.3;

/// `ln(1 + x) − x` for `x > −1`.
///
/// Near `0` the value is `≈ −x²/2` and the direct difference loses about
/// `|log₁₀ x|` digits, so `|x| < 0.3` uses the alternating series
/// `−x²/2 + x³/3 − x⁴/4 + ⋯`. Returns `-∞` at `x = −1` and `NaN` below.
pub fn log1pmx(x: f64) -> f64 {
    if x.is_nan() || x.abs() >= SERIES_CUTOFF {
        return x.ln_1p() - x;
    }
    let mut power = x * x;
    let mut sum = 0.0;
    let mut n = 2.0;
    loop {
        let term = power / n;
        // Odd powers enter with +, even with −.
        sum += if (n as u32) % 2 == 0 { -term } else { term };
        if term.abs() <= f64::EPSILON * sum.abs() {
            return sum;
        }
        power *= x;
        n += 1.0;
    }
}

/// `exp(x) − 1 − x`, with `exp` bounded as in [`safe_exp`].
///
/// `|x| < 0.3` uses the series `x²/2! + x³/3! + ⋯`; elsewhere the direct
/// formula is well conditioned.
pub fn expm1mx(x: f64) -> f64 {
    if x.is_nan() || x.abs() >= SERIES_CUTOFF {
        return if x > MAX_SAFE_EXP_ARG { safe_exp(x) - 1.0 - x } else { x.exp_m1() - x };
    }
    let mut term = x * x / 2.0;
    let mut sum = term;
    let mut n = 3.0;
    while term.abs() > f64::EPSILON * sum.abs() {
        term *= x / n;
        sum += term;
        n += 1.0;
    }
    sum
}
