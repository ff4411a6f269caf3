//! High-level entry point for maximizing a `LogLikelihood`.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`),
//! and delegates each run to `run_lbfgs`. A run that a line search aborts
//! after improving on its start is resumed from its best point with a fresh
//! L-BFGS history, at most [`MAX_RESTARTS`] times and within the overall
//! iteration budget.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions, RunEnd},
        types::Cost,
    },
};
use tracing::debug;

/// Restarts allowed after an aborted run.
pub const MAX_RESTARTS: usize = 3;

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)` and requires a
///   finite `ℓ(theta0)`.
/// - Builds the solver named by `opts.line_searcher` and runs it through
///   `run_lbfgs`.
/// - While a run ends in [`RunEnd::Aborted`] with a better value than its
///   start, restarts from the best point (fresh solver, remaining budget).
///
/// The returned outcome describes the last run; `iterations` and
/// `fn_evals` are summed over all runs. Callers decide what an
/// [`RunEnd::Aborted`] outcome means for them.
///
/// # Errors
/// - Whatever `check` rejects; `NonFiniteCost` for a non-finite `ℓ(theta0)`;
///   invalid solver configuration; errors raised by the model during a run.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let cost0 = ArgMinAdapter::new(f, data).checked_cost(&theta0)?;

    let mut outcome = solve(f, data, cost0, theta0, opts)?;
    let mut start_value = -cost0;
    for _ in 0..MAX_RESTARTS {
        if outcome.run_end != RunEnd::Aborted || outcome.value <= start_value {
            break;
        }
        let mut run_opts = opts.clone();
        if let Some(max_iter) = opts.tols.max_iter {
            if outcome.iterations >= max_iter {
                break;
            }
            run_opts.tols.max_iter = Some(max_iter - outcome.iterations);
        }
        debug!(
            status = %outcome.status,
            iterations = outcome.iterations,
            value = outcome.value,
            "L-BFGS run aborted; restarting from best point"
        );
        start_value = outcome.value;
        let mut next = solve(f, data, cost0, outcome.theta_hat.clone(), &run_opts)?;
        next.absorb_counts(&outcome);
        outcome = next;
    }
    Ok(outcome)
}

fn solve<F: LogLikelihood>(
    f: &F, data: &F::Data, cost0: Cost, theta: Theta, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    let problem = ArgMinAdapter::new(f, data).with_penalty_above(cost0);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Cost, Grad, Tolerances},
    };
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `maximize` on a Gaussian log-likelihood with known optimum, with and
    //   without an analytic gradient, for both line searches.
    // - Trial steps into a region where ℓ is not finite, for both line
    //   searches (the first L-BFGS step and Hager–Zhang's initial bracket).
    // - Rejection of the starting point through `check` or a non-finite ℓ.
    // -------------------------------------------------------------------------

    /// ℓ(m, s) of N(m, e^{2s}) for a fixed sample; optimum at the sample mean
    /// and ln of the population standard deviation.
    struct Gaussian {
        analytic: bool,
    }

    impl LogLikelihood for Gaussian {
        type Data = Array1<f64>;

        fn value(&self, theta: &Theta, data: &Array1<f64>) -> OptResult<Cost> {
            let (m, s) = (theta[0], theta[1]);
            let n = data.len() as f64;
            let ss = data.mapv(|x| (x - m).powi(2)).sum();
            Ok(-n * s - 0.5 * ss * (-2.0 * s).exp())
        }

        fn check(&self, theta: &Theta, _data: &Array1<f64>) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, data: &Array1<f64>) -> OptResult<Grad> {
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            let (m, s) = (theta[0], theta[1]);
            let n = data.len() as f64;
            let w = (-2.0 * s).exp();
            let sum = data.mapv(|x| x - m).sum();
            let ss = data.mapv(|x| (x - m).powi(2)).sum();
            Ok(array![sum * w, -n + ss * w])
        }
    }

    /// ℓ(θ) = 2 ln θ − θ², maximal at θ = 1 and NaN for θ ≤ 0.
    struct Barrier;

    impl LogLikelihood for Barrier {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(2.0 * theta[0].ln() - theta[0].powi(2))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Both gradient paths and both line searches reach the closed-form MLE.
    //
    // Given
    // -----
    // - data = [1, 2, 4, 7]: mean 3.5, population variance 5.25.
    //
    // Expect
    // ------
    // - θ̂ ≈ (3.5, ½ ln 5.25) and a converged outcome.
    fn maximize_reaches_gaussian_mle() {
        let data = array![1.0, 2.0, 4.0, 7.0];
        let tols = Tolerances::new(Some(1e-6), None, Some(200)).unwrap();
        for analytic in [true, false] {
            for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
                // Arrange
                let opts = MLEOptions::new(tols, searcher, false, None).unwrap();
                let model = Gaussian { analytic };

                // Act
                let outcome = maximize(&model, array![0.0, 0.0], &data, &opts).unwrap();

                // Assert
                assert!(outcome.converged, "{searcher:?}, analytic={analytic}: {}", outcome.status);
                assert_eq!(outcome.run_end, RunEnd::Converged);
                assert_relative_eq!(outcome.theta_hat[0], 3.5, epsilon = 1e-5);
                assert_relative_eq!(outcome.theta_hat[1], 0.5 * 5.25_f64.ln(), epsilon = 1e-5);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A step that lands where ℓ is not finite is backed off instead of
    // ending the run.
    //
    // Given
    // -----
    // - ℓ(θ) = 2 ln θ − θ² from θ₀ = 4: the unit L-BFGS step goes to
    //   θ = −3.5, and Hager–Zhang's initial bracket reaches far beyond.
    //
    // Expect
    // ------
    // - Both line searches converge to θ̂ = 1 with ℓ̂ = −1.
    fn maximize_backs_off_non_finite_trial_points() {
        let tols = Tolerances::new(Some(1e-6), None, Some(200)).unwrap();
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let opts = MLEOptions::new(tols, searcher, false, None).unwrap();

            // Act
            let outcome = maximize(&Barrier, array![4.0], &(), &opts).unwrap();

            // Assert
            assert!(outcome.converged, "{searcher:?}: {}", outcome.status);
            assert_relative_eq!(outcome.theta_hat[0], 1.0, epsilon = 1e-5);
            assert_relative_eq!(outcome.value, -1.0, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // A starting point with non-finite ℓ is an error, not a plateau.
    fn maximize_rejects_non_finite_start() {
        let result = maximize(&Barrier, array![-1.0], &(), &MLEOptions::default());
        assert!(matches!(result, Err(OptError::NonFiniteCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before any solver work.
    fn maximize_propagates_check_failure() {
        let data = array![1.0, 2.0];
        let result = maximize(&Gaussian { analytic: true }, array![0.0], &data, &MLEOptions::default());
        assert_eq!(result, Err(OptError::ThetaLengthMismatch { expected: 2, actual: 1 }));
    }
}
