//! Censored log-likelihood for known-form survival models.
//!
//! Purpose
//! -------
//! Turn the four evaluators of a [`KnownParametricModel`] into the weighted
//! log-likelihood of a censored sample, averaged per unit of weight so that
//! optimizer tolerances do not depend on sample size.
//!
//! Key behaviors
//! -------------
//! With weights `w`, event flags `E`, and optional entry times `e`:
//!
//! - right: `Σ_E w ln h(T) − Σ w H(T)`
//! - left: `Σ_E w (ln h(T) − H(T)) + Σ_¬E w ln(1 − S(T))`
//! - interval: `Σ_E w (ln h(U) − H(U)) + Σ_¬E w ln(S(L) − S(U))`
//!
//! plus, for every variant, the delayed-entry correction `Σ_{e>0} w H(e)`.
//! The whole sum is divided by `Σ w`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The interval mass is evaluated as `−H(L) + ln(1 − e^{H(L) − H(U)})`,
//!   which stays finite when both survival values underflow, and is floored
//!   at [`LOG_PROB_FLOOR`] so one vanishing interval cannot send the sum to
//!   `−∞`. `upper = +∞` reduces to the right-censored term `−H(L)`.
//! - Censored rows never read `ln h`; `NaN` there does not leak into the sum.
//! - Domain problems (non-positive times, `λ = 0`) surface as a `NaN`
//!   result; only structural problems are errors.
use crate::{
    optimization::numerical_stability::{LOG_PROB_FLOOR, log1m_exp},
    survival::{
        core::data::{CensoredTimes, SurvivalData},
        errors::ParamResult,
        models::KnownParametricModel,
    },
};
use ndarray::{ArrayView1, Zip};

/// Weighted, per-unit-weight censored log-likelihood at `theta`.
pub fn log_likelihood<M: KnownParametricModel + ?Sized>(
    model: &M, theta: ArrayView1<f64>, data: &SurvivalData,
) -> ParamResult<f64> {
    let total = match &data.times {
        CensoredTimes::Right { durations } => right_censored(model, theta, durations.view(), data)?,
        CensoredTimes::Left { durations } => left_censored(model, theta, durations.view(), data)?,
        CensoredTimes::Interval { lower, upper } => {
            interval_censored(model, theta, lower.view(), upper.view(), data)?
        }
    };
    let entry = delayed_entry(model, theta, data)?;
    Ok((total + entry) / data.total_weight())
}

fn right_censored<M: KnownParametricModel + ?Sized>(
    model: &M, theta: ArrayView1<f64>, durations: ArrayView1<f64>, data: &SurvivalData,
) -> ParamResult<f64> {
    let log_h = model.log_hazard(theta, durations)?;
    let cum_haz = model.cumulative_hazard(theta, durations)?;
    Ok(Zip::from(&log_h).and(&cum_haz).and(&data.event_observed).and(&data.weights).fold(
        0.0,
        |acc, &lh, &ch, &event, &w| {
            let observed = if event { lh } else { 0.0 };
            acc + w * (observed - ch)
        },
    ))
}

fn left_censored<M: KnownParametricModel + ?Sized>(
    model: &M, theta: ArrayView1<f64>, durations: ArrayView1<f64>, data: &SurvivalData,
) -> ParamResult<f64> {
    let log_h = model.log_hazard(theta, durations)?;
    let cum_haz = model.cumulative_hazard(theta, durations)?;
    let log_cdf = model.log_complement_survival(theta, durations)?;
    Ok(Zip::from(&log_h)
        .and(&cum_haz)
        .and(&log_cdf)
        .and(&data.event_observed)
        .and(&data.weights)
        .fold(0.0, |acc, &lh, &ch, &lf, &event, &w| {
            let contribution = if event { lh - ch } else { lf };
            acc + w * contribution
        }))
}

fn interval_censored<M: KnownParametricModel + ?Sized>(
    model: &M, theta: ArrayView1<f64>, lower: ArrayView1<f64>, upper: ArrayView1<f64>,
    data: &SurvivalData,
) -> ParamResult<f64> {
    let log_h_upper = model.log_hazard(theta, upper)?;
    let cum_haz_upper = model.cumulative_hazard(theta, upper)?;
    let cum_haz_lower = model.cumulative_hazard(theta, lower)?;
    Ok(Zip::from(&log_h_upper)
        .and(&cum_haz_upper)
        .and(&cum_haz_lower)
        .and(&data.event_observed)
        .and(&data.weights)
        .fold(0.0, |acc, &lh_u, &ch_u, &ch_l, &event, &w| {
            let contribution =
                if event { lh_u - ch_u } else { floor_log_prob(-ch_l + log1m_exp(ch_l - ch_u)) };
            acc + w * contribution
        }))
}

fn delayed_entry<M: KnownParametricModel + ?Sized>(
    model: &M, theta: ArrayView1<f64>, data: &SurvivalData,
) -> ParamResult<f64> {
    let Some(entry) = data.entry_view() else {
        return Ok(0.0);
    };
    let cum_haz = model.cumulative_hazard(theta, entry)?;
    Ok(Zip::from(&entry).and(&cum_haz).and(&data.weights).fold(0.0, |acc, &e, &ch, &w| {
        if e > 0.0 { acc + w * ch } else { acc }
    }))
}

/// `NaN` passes through; only finite underflow is floored.
#[inline]
fn floor_log_prob(log_prob: f64) -> f64 {
    if log_prob < LOG_PROB_FLOOR { LOG_PROB_FLOOR } else { log_prob }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survival::{
        core::params::GGParams, models::generalized_gamma::GeneralizedGammaFitter,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form log-likelihoods of the unit exponential (reference vector)
    //   for each censoring variant.
    // - Weights and delayed entry.
    // - Flooring of vanishing interval masses and NaN propagation.
    // -------------------------------------------------------------------------

    fn reference_theta() -> ndarray::Array1<f64> {
        GGParams::new(0.0, 0.0, 1.0).to_theta()
    }

    #[test]
    // Purpose
    // -------
    // Right censoring under the unit exponential: ln h = 0, H(t) = t.
    //
    // Given
    // -----
    // - T = [1, 2, 3], E = [true, false, true].
    //
    // Expect
    // ------
    // - ℓ = −(1 + 2 + 3)/3 = −2.
    fn right_censored_exponential() {
        // Arrange
        let model = GeneralizedGammaFitter::default();
        let data =
            SurvivalData::right_censored(array![1.0, 2.0, 3.0], Some(array![true, false, true]))
                .unwrap();

        // Act
        let ll = log_likelihood(&model, reference_theta().view(), &data).unwrap();

        // Assert
        assert_relative_eq!(ll, -2.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Left censoring: observed rows contribute ln f = −t, censored rows
    // ln(1 − e^{−t}).
    fn left_censored_exponential() {
        let model = GeneralizedGammaFitter::default();
        let data = SurvivalData::left_censored(array![1.0, 2.0], Some(array![true, false]))
            .unwrap();
        let expected = (-1.0 + (1.0 - (-2.0_f64).exp()).ln()) / 2.0;
        let ll = log_likelihood(&model, reference_theta().view(), &data).unwrap();
        assert_relative_eq!(ll, expected, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Interval censoring: censored rows contribute ln(e^{−L} − e^{−U}); an
    // infinite upper bound reduces to −L; exact rows contribute −U.
    fn interval_censored_exponential() {
        let model = GeneralizedGammaFitter::default();
        let data = SurvivalData::interval_censored(
            array![1.0, 2.0, 0.5],
            array![3.0, f64::INFINITY, 0.5],
            None,
        )
        .unwrap();
        let expected = (((-1.0_f64).exp() - (-3.0_f64).exp()).ln() - 2.0 - 0.5) / 3.0;
        let ll = log_likelihood(&model, reference_theta().view(), &data).unwrap();
        assert_relative_eq!(ll, expected, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // A zero-width censored interval has zero mass and is floored instead of
    // contributing −∞.
    fn vanishing_interval_is_floored() {
        let model = GeneralizedGammaFitter::default();
        let data =
            SurvivalData::interval_censored(array![2.0], array![2.0], Some(array![false])).unwrap();
        let ll = log_likelihood(&model, reference_theta().view(), &data).unwrap();
        assert_eq!(ll, LOG_PROB_FLOOR);
    }

    #[test]
    // Purpose
    // -------
    // Interval lower bounds must be positive; a zero bound is not read as
    // left censoring.
    //
    // Given
    // -----
    // - One censored interval (0, 2] next to the same row encoded as
    //   left-censored at 2.
    //
    // Expect
    // ------
    // - The interval likelihood is NaN; the left-censored one is
    //   ln(1 − e^{−2}).
    fn interval_with_zero_lower_bound_is_nan() {
        // Arrange
        let model = GeneralizedGammaFitter::default();
        let interval =
            SurvivalData::interval_censored(array![0.0], array![2.0], Some(array![false])).unwrap();
        let left = SurvivalData::left_censored(array![2.0], Some(array![false])).unwrap();

        // Act
        let ll_interval = log_likelihood(&model, reference_theta().view(), &interval).unwrap();
        let ll_left = log_likelihood(&model, reference_theta().view(), &left).unwrap();

        // Assert
        assert!(ll_interval.is_nan());
        assert_relative_eq!(ll_left, (1.0 - (-2.0_f64).exp()).ln(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Weights scale contributions and the average is per unit of weight;
    // delayed entry adds back H(entry).
    //
    // Given
    // -----
    // - T = [1, 4], weights [3, 1], entry [0.5, 0], all events.
    //
    // Expect
    // ------
    // - ℓ = (3·(−1) + 1·(−4) + 3·0.5) / 4.
    fn weights_and_delayed_entry() {
        let model = GeneralizedGammaFitter::default();
        let data = SurvivalData::new(
            CensoredTimes::Right { durations: array![1.0, 4.0] },
            None,
            Some(array![3.0, 1.0]),
            Some(array![0.5, 0.0]),
        )
        .unwrap();
        let ll = log_likelihood(&model, reference_theta().view(), &data).unwrap();
        assert_relative_eq!(ll, (-3.0 - 4.0 + 1.5) / 4.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Non-positive times give a NaN likelihood; a wrong θ length is an error.
    fn domain_and_structural_failures() {
        let model = GeneralizedGammaFitter::default();
        let data = SurvivalData::right_censored(array![1.0, 0.0], None).unwrap();
        assert!(log_likelihood(&model, reference_theta().view(), &data).unwrap().is_nan());

        let ok = SurvivalData::right_censored(array![1.0], None).unwrap();
        assert!(log_likelihood(&model, array![0.0, 1.0].view(), &ok).is_err());
    }
}
