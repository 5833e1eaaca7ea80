/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A single power-method step.
//!
//! # The formula
//!
//! If we denote with *r*(*n*) the rank of node *n* at iteration *t*, with *N*
//! the number of nodes, with *D* the set of dangling nodes and with α the
//! random-jump (teleport) probability, the rank of node *m* at iteration
//! *t* + 1 is
//!
//! > *r*′(*m*) = α / *N* + (1 − α) ( δ / *N* + ∑_(*j* → *m*) *r*(*j*) / *d*⁺(*j*) )
//!
//! where δ = ∑_(*j* ∈ *D*) *r*(*j*) is the _dangling mass_ and *d*⁺(*j*) is
//! the outdegree of *j*. In other words, every non-dangling node splits its
//! rank into equal contributions, one for each out-neighbor; contributions
//! addressed to the same node are summed; the rank of dangling nodes is
//! redistributed uniformly over all nodes in the same iteration; and a
//! fraction α of the total mass teleports uniformly. When α = 0 the step is a
//! pure redistribution. Since contributions are neither created nor
//! destroyed, the new ranks sum to one if the previous ones did.
//!
//! # Execution
//!
//! The step is a pure function of the graph and of the previous table, so it
//! can be executed in parallel without locks. The node range is cut into
//! partitions of fixed [granularity](Granularity):
//!
//! 1. the dangling mass is computed as a compensated sum on each partition
//!    of the (sorted) list of dangling nodes, and the partial sums are reduced
//!    in partition order;
//! 2. each partition of destinations then gathers the contributions of the
//!    predecessors of its nodes, scanning the transpose, and assigns the new
//!    ranks.
//!
//! Gathering by destination is equivalent to scattering contributions along
//! arcs and summing them by key, but it needs no shuffle. Since every sum is
//! performed in a fixed order, the result is the same for any number of
//! threads.

use crate::error::RankError;
use crate::graphs::adjacency_graph::AdjacencyGraph;
use crate::utils::Granularity;
use kahan::KahanSum;
use rayon::prelude::*;

use super::RankTable;

/// The outcome of a [propagation step](propagate).
#[derive(Debug, Clone)]
pub struct Propagation<'a, N> {
    /// The new rank table.
    pub rank: RankTable<'a, N>,
    /// The dangling mass that has been redistributed, that is, the rank held by
    /// dangling nodes in the previous table.
    pub dangling_mass: f64,
}

/// Computes the next rank table.
///
/// `alpha` is the random-jump probability; see the [module
/// documentation](self) for the formula.
///
/// # Panics
///
/// Panics if `alpha` is not in [0 . . 1), or if `prev` is not a table of
/// `graph`.
pub fn propagate<'a, N: Sync>(
    graph: &'a AdjacencyGraph<N>,
    prev: &RankTable<'_, N>,
    alpha: f64,
    granularity: Granularity,
) -> Result<Propagation<'a, N>, RankError> {
    assert!(
        // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
        (0.0..1.0).contains(&alpha),
        "The random-jump probability must be in [0 . . 1), got {alpha}"
    );
    let n = graph.num_nodes();
    if n == 0 {
        return Err(RankError::EmptyGraph);
    }
    assert_eq!(
        prev.len(),
        n,
        "The rank table has {} entries, but the graph has {n} nodes",
        prev.len()
    );
    assert!(
        std::ptr::eq(prev.graph(), graph),
        "The rank table belongs to a different graph"
    );

    let rank = prev.as_slice();
    let inv_n = 1.0 / n as f64;
    let node_granularity = granularity.node_granularity(n, graph.num_arcs());

    // Phase 1: dangling mass
    let partial_dangling: Vec<f64> = graph
        .dangling_nodes()
        .par_chunks(node_granularity)
        .map(|chunk| {
            let mut mass = KahanSum::new();
            for &j in chunk {
                mass += rank[j];
            }
            mass.sum()
        })
        .collect();
    let mut dangling_mass = KahanSum::new();
    for mass in partial_dangling {
        dangling_mass += mass;
    }
    let dangling_mass = dangling_mass.sum();

    // Phase 2: gather contributions and assign ranks
    let mut next = vec![0.0; n].into_boxed_slice();
    next.par_chunks_mut(node_granularity)
        .enumerate()
        .for_each(|(chunk, chunk_rank)| {
            let start = chunk * node_granularity;
            for (offset, next_m) in chunk_rank.iter_mut().enumerate() {
                let mut sigma = KahanSum::new();
                for &j in graph.predecessors(start + offset) {
                    sigma += rank[j] / graph.outdegree(j) as f64;
                }
                *next_m = alpha * inv_n + (1.0 - alpha) * (dangling_mass * inv_n + sigma.sum());
            }
        });

    Ok(Propagation {
        rank: RankTable::from_boxed(graph, next),
        dangling_mass,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::samples::Sample;

    #[test]
    fn test_first_step_book() -> Result<(), RankError> {
        let g = Sample::Book.graph()?;
        let t = RankTable::uniform(&g)?;
        let p = propagate(&g, &t, 0.0, Granularity::default())?;
        assert_eq!(p.dangling_mass, 0.0);
        // L1 only receives a third of L5's rank
        assert!((p.rank.get(&"L1")? - 0.2 / 3.0).abs() < 1E-15);
        // L4 receives half of L1's rank and all of L3's
        assert!((p.rank.get(&"L4")? - (0.1 + 0.2)).abs() < 1E-15);
        assert!((p.rank.sum() - 1.0).abs() < 1E-12);
        Ok(())
    }

    #[test]
    fn test_no_inbound_arcs() -> Result<(), RankError> {
        // Node 0 has no predecessors
        let g = AdjacencyGraph::build([(0, vec![1]), (1, vec![2]), (2, vec![1])])?;
        let t = RankTable::uniform(&g)?;
        let p = propagate(&g, &t, 0.0, Granularity::default())?;
        assert_eq!(p.rank.get_by_id(0), 0.0);
        let p = propagate(&g, &t, 0.5, Granularity::default())?;
        assert!((p.rank.get_by_id(0) - 0.5 / 3.0).abs() < 1E-15);
        Ok(())
    }

    #[test]
    fn test_granularity_does_not_matter() -> Result<(), RankError> {
        let g = Sample::Dangle.graph()?;
        let t = RankTable::new(&g, vec![0.1, 0.3, 0.2, 0.25, 0.15])?;
        let expected = propagate(&g, &t, 0.15, Granularity::Nodes(1000))?;
        for g_nodes in 1..=5 {
            let p = propagate(&g, &t, 0.15, Granularity::Nodes(g_nodes))?;
            assert_eq!(p.rank.as_slice(), expected.rank.as_slice());
            assert_eq!(p.dangling_mass, expected.dangling_mass);
        }
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_alpha_one() {
        let g = Sample::Book.graph().unwrap();
        let t = RankTable::uniform(&g).unwrap();
        let _ = propagate(&g, &t, 1.0, Granularity::default());
    }

    #[test]
    #[should_panic(expected = "different graph")]
    fn test_table_of_another_graph() {
        let book = Sample::Book.graph().unwrap();
        let dangle = Sample::Dangle.graph().unwrap();
        let t = RankTable::uniform(&dangle).unwrap();
        let _ = propagate(&book, &t, 0.0, Granularity::default());
    }
}
