//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait a model implements to be fitted.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by [`maximize`](super::maximize).
//!
//! Convention: we *maximize* a log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it is the gradient of
//! the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Log-likelihood interface consumed by the optimizer.
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`. A
///   non-finite value is rejected by the adapter.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject an unusable starting
///   point. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, finite differences of the cost are used.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parses case-insensitively from `"MoreThuente"` / `"HagerZhang"`; unknown
/// names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `verbose: bool` — emit per-iteration progress (argmin slog observer,
///   behind the `obs_slog` feature) and a `tracing` event for the start.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history; `None` uses
///   [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM).
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None`
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Errors with `InvalidLBFGSMem` when `lbfgs_mem == Some(0)`; numeric
    /// tolerances are validated by [`Tolerances::new`].
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// How an L-BFGS run ended.
///
/// - `Converged`: a gradient or cost tolerance was met (or a target cost).
/// - `MaxIters`: the iteration budget ran out first.
/// - `Aborted`: the solver gave up, most often because a line search
///   failed; the best point is whatever argmin held at that moment.
/// - `NotTerminated`: no termination was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    Converged,
    MaxIters,
    Aborted,
    NotTerminated,
}

impl From<&TerminationStatus> for RunEnd {
    fn from(status: &TerminationStatus) -> Self {
        match status {
            TerminationStatus::NotTerminated => RunEnd::NotTerminated,
            TerminationStatus::Terminated(reason) => match reason {
                TerminationReason::SolverConverged | TerminationReason::TargetCostReached => {
                    RunEnd::Converged
                }
                TerminationReason::MaxItersReached => RunEnd::MaxIters,
                TerminationReason::SolverExit(_)
                | TerminationReason::Interrupt
                | TerminationReason::Timeout => RunEnd::Aborted,
            },
        }
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` only when `run_end == RunEnd::Converged`.
/// - `run_end`: classification of the termination status.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed, summed over
///   restarts.
/// - `fn_evals`: argmin's evaluation counters (cost_count, gradient_count, ...).
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub run_end: RunEnd,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// - `MissingThetaHat` / `InvalidThetaHat` for an absent or non-finite
    ///   best parameter, `NonFiniteCost` for a non-finite value.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let run_end = RunEnd::from(&termination);
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged: run_end == RunEnd::Converged,
            run_end,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }

    /// Fold the counters of an earlier run into this one.
    pub fn absorb_counts(&mut self, earlier: &OptimOutcome) {
        self.iterations += earlier.iterations;
        for (name, count) in &earlier.fn_evals {
            *self.fn_evals.entry(name.clone()).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerances / MLEOptions validation rules.
    // - LineSearcher parsing.
    // - OptimOutcome status mapping and validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Validation of tolerances and L-BFGS memory.
    fn options_validation() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(Tolerances::new(None, None, Some(0)), Err(OptError::InvalidMaxIter { .. })));

        let tols = Tolerances::new(Some(1e-6), None, Some(10)).unwrap();
        assert!(matches!(
            MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
        let opts = MLEOptions::new(tols, LineSearcher::HagerZhang, true, Some(5)).unwrap();
        assert_eq!(opts.lbfgs_mem, Some(5));
        assert_eq!(MLEOptions::default().tols.max_iter, Some(300));
    }

    #[test]
    // Purpose
    // -------
    // Case-insensitive parsing of line-search names.
    fn line_searcher_from_str() {
        assert_eq!("hagerzhang".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("MoreThuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!("bfgs".parse::<LineSearcher>(), Err(OptError::InvalidLineSearch { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Only a tolerance-based stop counts as converged; a line-search exit
    // and a NotTerminated state do not; a missing best parameter is an error.
    fn outcome_status_mapping() {
        let done = OptimOutcome::new(
            Some(array![1.0, 2.0]),
            -3.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .unwrap();
        assert!(done.converged);
        assert_eq!(done.run_end, RunEnd::Converged);
        assert_eq!(done.iterations, 12);
        assert_eq!(done.grad_norm, Some(5.0));

        let exited = OptimOutcome::new(
            Some(array![1.0, 2.0]),
            -3.5,
            TerminationStatus::Terminated(TerminationReason::SolverExit(
                "Line search terminated with: 'Non-finite cost value: NaN'".to_string(),
            )),
            1,
            FnEvalMap::new(),
            None,
        )
        .unwrap();
        assert!(!exited.converged);
        assert_eq!(exited.run_end, RunEnd::Aborted);

        let budget = OptimOutcome::new(
            Some(array![1.0]),
            0.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            300,
            FnEvalMap::new(),
            None,
        )
        .unwrap();
        assert!(!budget.converged);
        assert_eq!(budget.run_end, RunEnd::MaxIters);

        let pending = OptimOutcome::new(
            Some(array![1.0]),
            0.0,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        )
        .unwrap();
        assert!(!pending.converged);
        assert_eq!(pending.run_end, RunEnd::NotTerminated);
        assert_eq!(pending.status, "Not terminated");

        assert_eq!(
            OptimOutcome::new(None, 0.0, TerminationStatus::NotTerminated, 0, FnEvalMap::new(), None),
            Err(OptError::MissingThetaHat)
        );
    }

    #[test]
    // Purpose
    // -------
    // Counters from an earlier run are added to the later one.
    fn absorb_counts_sums_counters() {
        let mut first = FnEvalMap::new();
        first.insert("cost_count".to_string(), 10);
        let mut second = FnEvalMap::new();
        second.insert("cost_count".to_string(), 4);
        second.insert("gradient_count".to_string(), 3);
        let status = || TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let earlier = OptimOutcome::new(Some(array![0.0]), 0.0, status(), 5, first, None).unwrap();
        let mut later = OptimOutcome::new(Some(array![0.0]), 0.0, status(), 2, second, None).unwrap();

        later.absorb_counts(&earlier);

        assert_eq!(later.iterations, 7);
        assert_eq!(later.fn_evals["cost_count"], 14);
        assert_eq!(later.fn_evals["gradient_count"], 3);
    }
}
