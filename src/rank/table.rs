/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::RankError;
use crate::graphs::adjacency_graph::AdjacencyGraph;
use kahan::KahanSum;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// The rank of every node of a graph at some iteration.
///
/// A table is an immutable value: a [propagation step](super::propagate)
/// produces a new table and leaves the previous one untouched, so readers of
/// the previous iteration are never affected.
///
/// Ranks are indexed by node identifier (see
/// [`AdjacencyGraph::node_id`]), and looked up by node through the graph the
/// table refers to.
pub struct RankTable<'a, N> {
    graph: &'a AdjacencyGraph<N>,
    rank: Box<[f64]>,
}

impl<N> Clone for RankTable<'_, N> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            rank: self.rank.clone(),
        }
    }
}

impl<N> std::fmt::Debug for RankTable<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankTable")
            .field("num_nodes", &self.rank.len())
            .field("rank", &self.rank)
            .finish_non_exhaustive()
    }
}

impl<'a, N> RankTable<'a, N> {
    /// Creates the uniform table assigning 1/*n* to each of the *n* nodes of
    /// the graph.
    pub fn uniform(graph: &'a AdjacencyGraph<N>) -> Result<Self, RankError> {
        let n = graph.num_nodes();
        if n == 0 {
            return Err(RankError::EmptyGraph);
        }
        Ok(Self {
            graph,
            rank: vec![1.0 / n as f64; n].into_boxed_slice(),
        })
    }

    /// Creates a table from a vector of ranks indexed by node identifier.
    ///
    /// # Panics
    ///
    /// Panics if the length of the vector does not match the number of nodes.
    /// In test mode, we also check that all values are nonnegative.
    pub fn new(graph: &'a AdjacencyGraph<N>, rank: Vec<f64>) -> Result<Self, RankError> {
        let n = graph.num_nodes();
        if n == 0 {
            return Err(RankError::EmptyGraph);
        }
        assert_eq!(
            rank.len(),
            n,
            "Rank vector length ({}) does not match the number of nodes ({n})",
            rank.len()
        );
        #[cfg(test)]
        for (i, &x) in rank.iter().enumerate() {
            assert!(x >= 0.0, "The rank vector has a negative entry at index {i}: {x}");
        }
        Ok(Self {
            graph,
            rank: rank.into_boxed_slice(),
        })
    }

    pub(crate) fn from_boxed(graph: &'a AdjacencyGraph<N>, rank: Box<[f64]>) -> Self {
        debug_assert_eq!(rank.len(), graph.num_nodes());
        Self { graph, rank }
    }

    /// Returns the graph this table refers to.
    pub fn graph(&self) -> &'a AdjacencyGraph<N> {
        self.graph
    }

    /// Returns the ranks, indexed by node identifier.
    pub fn as_slice(&self) -> &[f64] {
        &self.rank
    }

    /// Returns the rank of the node with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not smaller than the number of nodes.
    #[inline(always)]
    pub fn get_by_id(&self, id: usize) -> f64 {
        self.rank[id]
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.rank.len()
    }

    /// Returns whether the table is empty, which never happens for a table
    /// built by this crate.
    pub fn is_empty(&self) -> bool {
        self.rank.is_empty()
    }

    /// Returns the sum of all ranks, computed with compensated summation.
    pub fn sum(&self) -> f64 {
        let mut sum = KahanSum::new();
        for &r in self.rank.iter() {
            sum += r;
        }
        sum.sum()
    }

    /// Returns the ℓ₁ distance between this table and another table on the
    /// same graph.
    ///
    /// # Panics
    ///
    /// Panics if the two tables have different lengths.
    pub fn l1_distance(&self, other: &RankTable<'_, N>) -> f64 {
        assert_eq!(self.len(), other.len());
        let mut sum = KahanSum::new();
        for (a, b) in self.rank.iter().zip(other.rank.iter()) {
            sum += (a - b).abs();
        }
        sum.sum()
    }

    /// Returns an iterator over pairs (node, rank), in identifier order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a N, f64)> + '_ {
        let graph = self.graph;
        self.rank
            .iter()
            .enumerate()
            .map(move |(i, &r)| (graph.node(i), r))
    }

    /// Returns pairs (node, rank) by decreasing rank; ties are broken by
    /// identifier.
    pub fn sorted_desc(&self) -> Vec<(&'a N, f64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        // Stable, so ties keep identifier order
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }
}

impl<N: Eq + Hash + Clone + Debug> RankTable<'_, N> {
    /// Returns the rank of a node.
    ///
    /// Returns [`RankError::UnknownNode`] if the node is not in the graph.
    pub fn get(&self, node: &N) -> Result<f64, RankError> {
        self.graph
            .node_id(node)
            .map(|id| self.rank[id])
            .ok_or_else(|| RankError::unknown_node(node))
    }

    /// Returns a map from nodes to ranks.
    pub fn to_map(&self) -> HashMap<N, f64> {
        self.iter().map(|(node, r)| (node.clone(), r)).collect()
    }

    /// Consumes the table, returning a map from nodes to ranks.
    pub fn into_map(self) -> HashMap<N, f64> {
        let graph = self.graph;
        graph.nodes().cloned().zip(self.rank.iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::samples::Sample;

    #[test]
    fn test_uniform() -> Result<(), RankError> {
        let g = Sample::Dangle.graph()?;
        let t = RankTable::uniform(&g)?;
        assert_eq!(t.len(), 5);
        assert_eq!(t.get(&"L3")?, 0.2);
        assert!((t.sum() - 1.0).abs() < 1E-15);
        assert_eq!(
            t.get(&"L6"),
            Err(RankError::UnknownNode {
                node: "\"L6\"".to_owned()
            })
        );
        Ok(())
    }

    #[test]
    fn test_empty() {
        let g = AdjacencyGraph::<u32>::build(Vec::<(u32, Vec<u32>)>::new()).unwrap();
        assert_eq!(RankTable::uniform(&g).unwrap_err(), RankError::EmptyGraph);
        assert_eq!(RankTable::new(&g, vec![]).unwrap_err(), RankError::EmptyGraph);
    }

    #[test]
    fn test_sorted_desc() -> Result<(), RankError> {
        let g = AdjacencyGraph::build([("a", vec![]), ("b", vec![]), ("c", vec![])])?;
        let t = RankTable::new(&g, vec![0.25, 0.5, 0.25])?;
        assert_eq!(t.sorted_desc(), vec![(&"b", 0.5), (&"a", 0.25), (&"c", 0.25)]);
        let map = t.into_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map[&"b"], 0.5);
        Ok(())
    }
}
