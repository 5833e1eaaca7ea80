/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::pagerank::preds::{MaxIter, PredParams, Tolerance};
use super::RankTable;
use predicates::Predicate;

/// How the difference between successive iterations is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Criterion {
    /// The absolute difference between successive ranks of a single reference
    /// node. This is the default, and it costs nothing on large graphs.
    #[default]
    ReferenceNode,
    /// The ℓ₁ norm of the difference between successive rank tables.
    L1Norm,
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::ReferenceNode => f.write_str("reference node"),
            Criterion::L1Norm => f.write_str("ℓ₁ norm"),
        }
    }
}

/// How a computation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The difference between the last two iterations was below the tolerance.
    Converged,
    /// The maximum number of iterations was performed without meeting the
    /// tolerance.
    MaxIterReached,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Converged => f.write_str("converged"),
            Termination::MaxIterReached => f.write_str("maximum number of iterations reached"),
        }
    }
}

/// The states of a [`ConvergenceMonitor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorState {
    /// The initial table has not been observed yet.
    AwaitingFirst,
    /// The computation is running; `previous` is the last observed rank of
    /// the reference node.
    Tracking { previous: f64 },
    /// Terminal: the tolerance test passed.
    Converged,
    /// Terminal: the iteration budget is exhausted.
    MaxIterReached,
}

impl MonitorState {
    /// Returns the termination corresponding to a terminal state.
    pub fn termination(&self) -> Option<Termination> {
        match self {
            MonitorState::Converged => Some(Termination::Converged),
            MonitorState::MaxIterReached => Some(Termination::MaxIterReached),
            _ => None,
        }
    }
}

/// Decides when a computation should stop.
///
/// The monitor follows the rank of a reference node across iterations: it
/// must be [started](Self::start) on the initial table, and then
/// [fed](Self::observe) the table produced by each iteration. After each
/// observation the tolerance test is evaluated first, and then the iteration
/// budget, so an iteration meeting the tolerance is reported as converged even
/// if it is the last one allowed.
///
/// ```text
/// AwaitingFirst ──start──▶ Tracking ──delta < |tolerance|──▶ Converged
///                            │  ▲
///                            └──┘ otherwise    ──budget exhausted──▶ MaxIterReached
/// ```
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    reference: usize,
    criterion: Criterion,
    tolerance: Tolerance,
    max_iter: MaxIter,
    state: MonitorState,
    iteration: usize,
    delta: f64,
}

impl ConvergenceMonitor {
    /// Creates a monitor tracking the node with identifier `reference`.
    pub fn new(
        reference: usize,
        criterion: Criterion,
        tolerance: Tolerance,
        max_iter: MaxIter,
    ) -> Self {
        Self {
            reference,
            criterion,
            tolerance,
            max_iter,
            state: MonitorState::AwaitingFirst,
            iteration: 0,
            delta: f64::INFINITY,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Returns the number of observed iterations.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the difference measured at the last iteration, or infinity if
    /// no iteration has been observed.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the identifier of the reference node.
    pub fn reference(&self) -> usize {
        self.reference
    }

    /// Observes the initial table.
    ///
    /// # Panics
    ///
    /// Panics if the monitor has already been started.
    pub fn start<N>(&mut self, initial: &RankTable<'_, N>) -> MonitorState {
        assert_eq!(
            self.state,
            MonitorState::AwaitingFirst,
            "The monitor has already been started"
        );
        self.state = MonitorState::Tracking {
            previous: initial.get_by_id(self.reference),
        };
        self.state
    }

    /// Observes the table produced by an iteration, given the table it was
    /// produced from, and returns the new state.
    ///
    /// # Panics
    ///
    /// Panics if the monitor has not been started, or if it is in a terminal
    /// state.
    pub fn observe<N>(
        &mut self,
        previous: &RankTable<'_, N>,
        current: &RankTable<'_, N>,
    ) -> MonitorState {
        let MonitorState::Tracking { previous: tracked } = self.state else {
            panic!("Cannot observe an iteration in state {:?}", self.state);
        };
        self.iteration += 1;

        let reference_rank = current.get_by_id(self.reference);
        self.delta = match self.criterion {
            Criterion::ReferenceNode => (reference_rank - tracked).abs(),
            Criterion::L1Norm => previous.l1_distance(current),
        };

        let params = PredParams {
            iteration: self.iteration,
            delta: self.delta,
        };
        self.state = if self.tolerance.eval(&params) {
            MonitorState::Converged
        } else if self.max_iter.eval(&params) {
            MonitorState::MaxIterReached
        } else {
            MonitorState::Tracking {
                previous: reference_rank,
            }
        };
        self.state
    }
}
