//! Censored survival data containers.
//!
//! Purpose
//! -------
//! Carry the observed times of one fitting problem together with the
//! censoring variant they belong to, per-observation event flags, weights,
//! and optional delayed-entry (left-truncation) times.
//!
//! Key behaviors
//! -------------
//! - [`CensoredTimes`] is an exhaustive tagged union over the three
//!   censoring variants, each owning exactly the arrays it needs. The
//!   initialization heuristic and the censored log-likelihood match on it.
//! - [`SurvivalData`] fills in defaults (all events observed for right/left
//!   data, `lower == upper` for interval data, unit weights) and checks that
//!   every column has one entry per observation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only *structural* checks are performed: non-empty input and matching
//!   lengths. Values themselves (positivity, ordering of interval bounds,
//!   finiteness) are not validated; degenerate values propagate as
//!   `NaN`/`±∞` through the kernels.
//! - Weights are expected to be non-negative with a positive total.
//!
//! Conventions
//! -----------
//! - Left-censored observations store their (upper) bound in `durations`;
//!   for an observed event it is the event time itself.
//! - Interval-censored observations with `upper = +∞` are right-censored at
//!   `lower`; `lower` itself must be `> 0`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the default fills per variant, weight/entry handling,
//!   and every length-mismatch path.
use crate::survival::errors::{SurvivalError, SurvivalResult};
use ndarray::{Array1, ArrayView1, Zip};

/// Observed times tagged by censoring variant.
#[derive(Debug, Clone, PartialEq)]
pub enum CensoredTimes {
    /// Event or last-seen time per subject; the event lies at or after it.
    Right { durations: Array1<f64> },
    /// Upper bound per subject; the event lies at or before it.
    Left { durations: Array1<f64> },
    /// The event lies inside `(lower, upper]`.
    ///
    /// Every `lower` must be strictly positive: `H(lower)` enters each
    /// censored row, and the kernels are `NaN` at `t ≤ 0`, so a zero lower
    /// bound makes the log-likelihood `NaN`. Encode "at or before `upper`"
    /// with [`CensoredTimes::Left`] instead. `upper = +∞` is allowed.
    Interval { lower: Array1<f64>, upper: Array1<f64> },
}

impl CensoredTimes {
    pub fn len(&self) -> usize {
        match self {
            CensoredTimes::Right { durations } | CensoredTimes::Left { durations } => {
                durations.len()
            }
            CensoredTimes::Interval { lower, .. } => lower.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label used in logs and Python-facing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CensoredTimes::Right { .. } => "right",
            CensoredTimes::Left { .. } => "left",
            CensoredTimes::Interval { .. } => "interval",
        }
    }
}

/// One censored fitting problem.
///
/// Fields
/// ------
/// - `times`: [`CensoredTimes`] with the observation arrays.
/// - `event_observed`: `true` where the event time is known exactly.
/// - `weights`: per-observation weights (defaults to 1).
/// - `entry`: optional delayed-entry times; entries `≤ 0` mean no truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalData {
    pub times: CensoredTimes,
    pub event_observed: Array1<bool>,
    pub weights: Array1<f64>,
    pub entry: Option<Array1<f64>>,
}

impl SurvivalData {
    /// Assemble a problem, filling defaults for absent columns.
    ///
    /// Errors
    /// ------
    /// - `EmptySeries` if there are no observations.
    /// - `LengthMismatch` if any column disagrees with the number of
    ///   observations (including `upper` vs `lower`).
    /// - `InvalidTotalWeight` if the weights do not sum to a finite positive
    ///   value.
    pub fn new(
        times: CensoredTimes, event_observed: Option<Array1<bool>>, weights: Option<Array1<f64>>,
        entry: Option<Array1<f64>>,
    ) -> SurvivalResult<Self> {
        let n = times.len();
        if n == 0 {
            return Err(SurvivalError::EmptySeries);
        }
        if let CensoredTimes::Interval { upper, .. } = &times {
            check_len("upper_bound", n, upper.len())?;
        }

        let event_observed = match event_observed {
            Some(events) => {
                check_len("event_observed", n, events.len())?;
                events
            }
            None => default_events(&times),
        };
        let weights = match weights {
            Some(w) => {
                check_len("weights", n, w.len())?;
                w
            }
            None => Array1::ones(n),
        };
        if let Some(entry) = &entry {
            check_len("entry", n, entry.len())?;
        }

        let total = weights.sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(SurvivalError::InvalidTotalWeight { value: total });
        }

        Ok(SurvivalData { times, event_observed, weights, entry })
    }

    /// Right-censored problem with unit weights and no delayed entry.
    pub fn right_censored(
        durations: Array1<f64>, event_observed: Option<Array1<bool>>,
    ) -> SurvivalResult<Self> {
        Self::new(CensoredTimes::Right { durations }, event_observed, None, None)
    }

    /// Left-censored problem with unit weights and no delayed entry.
    pub fn left_censored(
        durations: Array1<f64>, event_observed: Option<Array1<bool>>,
    ) -> SurvivalResult<Self> {
        Self::new(CensoredTimes::Left { durations }, event_observed, None, None)
    }

    /// Interval-censored problem with unit weights and no delayed entry.
    pub fn interval_censored(
        lower: Array1<f64>, upper: Array1<f64>, event_observed: Option<Array1<bool>>,
    ) -> SurvivalResult<Self> {
        Self::new(CensoredTimes::Interval { lower, upper }, event_observed, None, None)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Sum of weights; the log-likelihood is reported per unit of weight.
    pub fn total_weight(&self) -> f64 {
        self.weights.sum()
    }

    pub fn entry_view(&self) -> Option<ArrayView1<'_, f64>> {
        self.entry.as_ref().map(|e| e.view())
    }
}

fn check_len(column: &'static str, expected: usize, actual: usize) -> SurvivalResult<()> {
    if expected != actual {
        return Err(SurvivalError::LengthMismatch { column, expected, actual });
    }
    Ok(())
}

fn default_events(times: &CensoredTimes) -> Array1<bool> {
    match times {
        CensoredTimes::Right { durations } | CensoredTimes::Left { durations } => {
            Array1::from_elem(durations.len(), true)
        }
        CensoredTimes::Interval { lower, upper } => {
            Zip::from(lower).and(upper).map_collect(|&l, &u| l == u)
        }
    }
}
