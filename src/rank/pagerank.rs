/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The PageRank driver.
//!
//! The driver starts from the uniform table assigning 1/*n* to each node and
//! performs up to a maximum number of [propagation steps](super::propagate),
//! each followed by a check of a [`ConvergenceMonitor`]. It stops as soon as
//! the monitor reports convergence, and returns the final table together with
//! the number of iterations performed, the elapsed time and the
//! [termination](Termination) state, so that callers can tell a converged
//! result from one produced at the iteration ceiling.
//!
//! # Stopping Criteria
//!
//! By default, the monitor tracks the rank of a single reference node (the
//! first node of the graph, unless another one is
//! [specified](PageRank::reference)), and the computation converges when the
//! absolute difference between its last two ranks is smaller than the
//! absolute value of the [tolerance](PageRank::tolerance). Optionally, the
//! ℓ₁ norm of the difference between the last two tables can be used
//! instead (see [`Criterion`]).
//!
//! Parameters can be set through setters, or collected in a [`Config`] and
//! passed to [`run`].

pub mod preds {
    //! Predicates implementing stopping conditions.
    //!
    //! A [`ConvergenceMonitor`](super::ConvergenceMonitor) evaluates these
    //! predicates after each iteration: they evaluate to true if the
    //! computation should be stopped.
    //!
    //! You can combine the predicates using the `and` and `or` methods provided
    //! by the [`Predicate`] trait.
    //!
    //! # Examples
    //! ```
    //! # fn main() -> Result<(), Box<dyn std::error::Error>> {
    //! use predicates::prelude::*;
    //! use webrank::rank::pagerank::preds::{MaxIter, PredParams, Tolerance};
    //!
    //! let predicate = Tolerance::try_from(-0.01)?.or(MaxIter::from(10));
    //! assert!(predicate.eval(&PredParams { iteration: 3, delta: 0.005 }));
    //! assert!(predicate.eval(&PredParams { iteration: 10, delta: 0.5 }));
    //! assert!(!predicate.eval(&PredParams { iteration: 3, delta: 0.5 }));
    //! #     Ok(())
    //! # }
    //! ```

    use anyhow::ensure;
    use predicates::{reflection::PredicateReflection, Predicate};
    use std::fmt::Display;

    #[doc(hidden)]
    /// This structure is passed to stopping predicates to provide the
    /// information that is needed to evaluate them.
    #[derive(Debug)]
    pub struct PredParams {
        pub iteration: usize,
        pub delta: f64,
    }

    /// Stops after at most the provided number of iterations.
    #[derive(Debug, Clone)]
    pub struct MaxIter {
        max_iter: usize,
    }

    impl MaxIter {
        pub const DEFAULT_MAX_ITER: usize = 10;

        /// Returns the maximum number of iterations.
        pub fn max_iter(&self) -> usize {
            self.max_iter
        }
    }

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            MaxIter { max_iter }
        }
    }

    impl Default for MaxIter {
        fn default() -> Self {
            Self::from(Self::DEFAULT_MAX_ITER)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(max iter: {})", self.max_iter))
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.iteration >= self.max_iter
        }
    }

    /// Stops when the difference between successive iterations is strictly
    /// smaller than a given tolerance.
    ///
    /// The tolerance is compared through its absolute value, so a negative
    /// tolerance behaves exactly as the corresponding positive one.
    #[derive(Debug, Clone)]
    pub struct Tolerance {
        tolerance: f64,
    }

    impl Tolerance {
        pub const DEFAULT_TOLERANCE: f64 = 0.01;

        /// Creates a tolerance predicate.
        ///
        /// # Panics
        ///
        /// Panics if `tolerance` is NaN.
        pub fn new(tolerance: f64) -> Self {
            assert!(!tolerance.is_nan(), "The tolerance cannot be NaN");
            Tolerance {
                tolerance: tolerance.abs(),
            }
        }

        /// Returns the absolute value of the tolerance.
        pub fn tolerance(&self) -> f64 {
            self.tolerance
        }
    }

    impl TryFrom<f64> for Tolerance {
        type Error = anyhow::Error;
        fn try_from(tolerance: f64) -> anyhow::Result<Self> {
            ensure!(!tolerance.is_nan(), "The tolerance cannot be NaN");
            Ok(Self::new(tolerance))
        }
    }

    impl Default for Tolerance {
        fn default() -> Self {
            Self::new(Self::DEFAULT_TOLERANCE)
        }
    }

    impl Display for Tolerance {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(tolerance: {})", self.tolerance))
        }
    }

    impl PredicateReflection for Tolerance {}
    impl Predicate<PredParams> for Tolerance {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.delta < self.tolerance
        }
    }
}

use self::preds::{MaxIter, Tolerance};
use super::{propagate, ConvergenceMonitor, Criterion, Propagation, RankTable, Termination};
use crate::error::RankError;
use crate::graphs::adjacency_graph::AdjacencyGraph;
use crate::utils::Granularity;
use dsi_progress_logger::{no_logging, ProgressLog};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// The parameters of a PageRank computation.
///
/// The default configuration has random-jump probability 0, at most 10
/// iterations, tolerance 0.01, the first node as reference node and the
/// reference-node criterion.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config<N> {
    /// The random-jump probability α, in [0 . . 1).
    pub alpha: f64,
    /// The maximum number of iterations (positive).
    pub max_iter: usize,
    /// The tolerance, compared through its absolute value.
    pub tolerance: f64,
    /// The reference node; if `None`, the first node of the graph.
    pub reference: Option<N>,
    /// The stopping criterion.
    pub criterion: Criterion,
    /// The size of parallel tasks.
    pub granularity: Granularity,
}

impl<N> Default for Config<N> {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            max_iter: MaxIter::DEFAULT_MAX_ITER,
            tolerance: Tolerance::DEFAULT_TOLERANCE,
            reference: None,
            criterion: Criterion::default(),
            granularity: Granularity::default(),
        }
    }
}

/// The result of a PageRank computation.
#[derive(Debug, Clone)]
pub struct RunResult<'a, N> {
    /// The final rank table.
    pub ranks: RankTable<'a, N>,
    /// The number of iterations performed.
    pub iterations: usize,
    /// How the computation ended.
    pub termination: Termination,
    /// The wall time of the computation.
    pub elapsed: Duration,
    /// The difference measured at the last iteration.
    pub delta: f64,
    /// The (absolute value of the) tolerance the computation was run with.
    pub tolerance: f64,
}

impl<N> RunResult<'_, N> {
    /// Returns whether the computation converged.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Returns the elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl<N: Eq + Hash + Clone + Debug> RunResult<'_, N> {
    /// Returns the final ranks as a map from nodes to ranks.
    pub fn final_ranks(&self) -> HashMap<N, f64> {
        self.ranks.to_map()
    }
}

impl<N> std::fmt::Display for RunResult<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.termination {
            Termination::Converged => write!(
                f,
                "With {} iteration(s) in {:.1} seconds PageRank has converged with successive results within {} of each other (last difference: {})",
                self.iterations,
                self.elapsed_seconds(),
                self.tolerance,
                self.delta
            ),
            Termination::MaxIterReached => write!(
                f,
                "PageRank performed the maximum number of {} iteration(s) in {:.1} seconds without reaching a difference between successive results within {} (last difference: {})",
                self.iterations,
                self.elapsed_seconds(),
                self.tolerance,
                self.delta
            ),
        }
    }
}

/// Computes PageRank by power-method iteration.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run), which returns a [`RunResult`]. The graph is only read,
/// so the same graph can be used for any number of computations.
///
/// # Examples
///
/// ```
/// use webrank::prelude::*;
///
/// let graph = AdjacencyGraph::build([
///     ("a", vec!["b", "c"]),
///     ("b", vec!["c"]),
///     ("c", vec!["a"]),
///     ("d", vec![]),
/// ]).unwrap();
///
/// let mut pr = PageRank::new(&graph);
/// pr.alpha(0.15).max_iter(1000).tolerance(1E-9);
/// let result = pr.run().unwrap();
///
/// assert_eq!(result.termination, Termination::Converged);
/// assert!((result.ranks.sum() - 1.0).abs() < 1E-9);
/// assert!(result.ranks.get(&"c").unwrap() > result.ranks.get(&"d").unwrap());
/// ```
pub struct PageRank<'a, N> {
    graph: &'a AdjacencyGraph<N>,
    alpha: f64,
    max_iter: MaxIter,
    tolerance: Tolerance,
    reference: Option<N>,
    criterion: Criterion,
    granularity: Granularity,
}

impl<N: Debug> std::fmt::Debug for PageRank<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRank")
            .field("alpha", &self.alpha)
            .field("max_iter", &self.max_iter)
            .field("tolerance", &self.tolerance)
            .field("reference", &self.reference)
            .field("criterion", &self.criterion)
            .field("granularity", &self.granularity)
            .finish_non_exhaustive()
    }
}

impl<'a, N: Eq + Hash + Clone + Debug + Sync> PageRank<'a, N> {
    /// Creates a new PageRank computation with default parameters.
    pub fn new(graph: &'a AdjacencyGraph<N>) -> Self {
        Self {
            graph,
            alpha: 0.0,
            max_iter: MaxIter::default(),
            tolerance: Tolerance::default(),
            reference: None,
            criterion: Criterion::default(),
            granularity: Granularity::default(),
        }
    }

    /// Creates a new PageRank computation from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration does not satisfy the preconditions of the
    /// setters.
    pub fn with_config(graph: &'a AdjacencyGraph<N>, config: &Config<N>) -> Self {
        let mut pr = Self::new(graph);
        pr.alpha(config.alpha)
            .max_iter(config.max_iter)
            .tolerance(config.tolerance)
            .reference(config.reference.clone())
            .criterion(config.criterion)
            .granularity(config.granularity);
        pr
    }

    /// Sets the random-jump probability α.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn alpha(&mut self, alpha: f64) -> &mut Self {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&alpha),
            "The random-jump probability must be in [0 . . 1), got {alpha}"
        );
        self.alpha = alpha;
        self
    }

    /// Sets the maximum number of iterations.
    ///
    /// # Panics
    ///
    /// Panics if `max_iter` is zero.
    pub fn max_iter(&mut self, max_iter: usize) -> &mut Self {
        assert!(max_iter > 0, "The maximum number of iterations must be positive");
        self.max_iter = MaxIter::from(max_iter);
        self
    }

    /// Sets the tolerance; only its absolute value matters.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is NaN.
    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.tolerance = Tolerance::new(tolerance);
        self
    }

    /// Sets the reference node tracked by the monitor.
    ///
    /// Pass `None` to track the first node of the graph.
    pub fn reference(&mut self, reference: Option<N>) -> &mut Self {
        self.reference = reference;
        self
    }

    /// Sets the stopping [criterion](Criterion).
    pub fn criterion(&mut self, criterion: Criterion) -> &mut Self {
        self.criterion = criterion;
        self
    }

    /// Sets the parallel task granularity.
    ///
    /// The granularity expresses how many
    /// [nodes](Granularity::node_granularity) will be passed to a Rayon task at
    /// a time.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }

    /// Runs the PageRank computation.
    pub fn run(&self) -> Result<RunResult<'a, N>, RankError> {
        self.run_with_logging(no_logging![])
    }

    /// Runs the PageRank computation, logging progress.
    ///
    /// `pl` is a [`ProgressLog`] counting iterations; its options will be
    /// preserved, making thus possible to customize the logs.
    ///
    /// Errors are returned before the first iteration: no partial result is
    /// ever produced.
    pub fn run_with_logging(
        &self,
        pl: &mut impl ProgressLog,
    ) -> Result<RunResult<'a, N>, RankError> {
        let start = Instant::now();
        let graph = self.graph;
        if graph.num_nodes() == 0 {
            return Err(RankError::EmptyGraph);
        }
        let reference = match &self.reference {
            Some(node) => graph
                .node_id(node)
                .ok_or_else(|| RankError::unknown_node(node))?,
            None => 0,
        };

        log::info!("Alpha: {}", self.alpha);
        log::info!(
            "Stopping criterion: {} {} or {}",
            self.criterion,
            self.tolerance,
            self.max_iter
        );
        log::info!("Reference node: {:?}", graph.node(reference));
        log::info!(
            "{} nodes, {} arcs, {} dangling nodes",
            graph.num_nodes(),
            graph.num_arcs(),
            graph.dangling_nodes().len()
        );

        let mut monitor = ConvergenceMonitor::new(
            reference,
            self.criterion,
            self.tolerance.clone(),
            self.max_iter.clone(),
        );
        let mut rank = RankTable::uniform(graph)?;
        monitor.start(&rank);

        pl.item_name("iteration");
        pl.expected_updates(Some(self.max_iter.max_iter()));
        pl.start(format!("Computing PageRank (alpha={})...", self.alpha));

        let termination = loop {
            let Propagation {
                rank: next,
                dangling_mass,
            } = propagate(graph, &rank, self.alpha, self.granularity)?;
            let state = monitor.observe(&rank, &next);
            rank = next;

            log::debug!(
                "Iteration {}: delta = {}, dangling mass = {}",
                monitor.iterations(),
                monitor.delta(),
                dangling_mass
            );
            pl.update_and_display();

            if let Some(termination) = state.termination() {
                break termination;
            }
        };

        pl.done();

        let result = RunResult {
            ranks: rank,
            iterations: monitor.iterations(),
            termination,
            elapsed: start.elapsed(),
            delta: monitor.delta(),
            tolerance: self.tolerance.tolerance(),
        };
        log::info!("{}", result);
        Ok(result)
    }
}

/// Runs a PageRank computation on `graph` with the given configuration.
///
/// # Panics
///
/// Panics if the configuration is invalid (see [`PageRank::with_config`]).
pub fn run<'a, N: Eq + Hash + Clone + Debug + Sync>(
    graph: &'a AdjacencyGraph<N>,
    config: &Config<N>,
) -> Result<RunResult<'a, N>, RankError> {
    PageRank::with_config(graph, config).run()
}
