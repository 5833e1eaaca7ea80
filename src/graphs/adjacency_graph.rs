/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! An immutable graph with arbitrary node identifiers.
//!
//! An [`AdjacencyGraph`] is built once from a sequence of adjacency records,
//! that is, pairs formed by a node and the ordered sequence of its
//! out-neighbors, and then shared read-only by all computations.
//!
//! Nodes are assigned dense identifiers in `0..n` following the order of first
//! appearance as record keys; successors and predecessors are then stored in
//! two compressed arrays indexed by such identifiers, so that a propagation
//! step can visit both directions without hashing.
//!
//! Records are deduplicated: a node appearing twice with the same successors
//! (as it happens when a crawler visits the same page twice) is stored once,
//! whereas a node appearing twice with different successors makes
//! [`build`](GraphBuilder::build) fail with [`RankError::InvalidGraph`].
//! Repeated successors within a record are kept only once, at their first
//! position.

use crate::error::RankError;
use std::collections::{hash_map::Entry, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// What to do with out-neighbors that never appear as record keys.
///
/// The policy is fixed when the graph is built and applies to all lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnknownNodes {
    /// Unknown out-neighbors make the construction fail with
    /// [`RankError::UnknownNode`], and so do lookups of nodes that are not in
    /// the graph. This is the default.
    #[default]
    Reject,
    /// Unknown out-neighbors become dangling nodes of the graph, and lookups of
    /// nodes that are not in the graph see a node without successors.
    AsDangling,
}

/// Builds [`AdjacencyGraph`] instances from adjacency records.
///
/// # Examples
///
/// ```
/// use webrank::graphs::adjacency_graph::{GraphBuilder, UnknownNodes};
///
/// let graph = GraphBuilder::new()
///     .unknown_nodes(UnknownNodes::AsDangling)
///     .build([("a", vec!["b", "c"]), ("b", vec!["a"])])
///     .unwrap();
///
/// // "c" has been added as a dangling node
/// assert_eq!(graph.num_nodes(), 3);
/// assert!(graph.is_dangling(graph.node_id(&"c").unwrap()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    unknown_nodes: UnknownNodes,
}

impl GraphBuilder {
    /// Creates a builder rejecting unknown nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the [policy](UnknownNodes) for out-neighbors without a record.
    pub fn unknown_nodes(&mut self, unknown_nodes: UnknownNodes) -> &mut Self {
        self.unknown_nodes = unknown_nodes;
        self
    }

    /// Builds a graph from a sequence of adjacency records.
    ///
    /// Each record is a node followed by the ordered sequence of its
    /// out-neighbors; an empty sequence denotes a dangling node.
    pub fn build<N, I, S>(&self, records: I) -> Result<AdjacencyGraph<N>, RankError>
    where
        N: Eq + Hash + Clone + Debug,
        I: IntoIterator<Item = (N, S)>,
        S: IntoIterator<Item = N>,
    {
        let mut ids: HashMap<N, usize> = HashMap::new();
        let mut nodes: Vec<N> = Vec::new();
        let mut adjacency: Vec<Vec<N>> = Vec::new();
        let mut duplicates = 0_usize;

        for (node, succ) in records {
            let mut seen = HashSet::new();
            let succ: Vec<N> = succ
                .into_iter()
                .filter(|v| seen.insert(v.clone()))
                .collect();

            match ids.entry(node) {
                Entry::Occupied(entry) => {
                    let id = *entry.get();
                    if adjacency[id] != succ {
                        return Err(RankError::invalid_graph(
                            entry.key(),
                            &adjacency[id],
                            &succ,
                        ));
                    }
                    duplicates += 1;
                }
                Entry::Vacant(entry) => {
                    nodes.push(entry.key().clone());
                    entry.insert(nodes.len() - 1);
                    adjacency.push(succ);
                }
            }
        }

        if duplicates > 0 {
            log::debug!("Collapsed {} duplicate adjacency records", duplicates);
        }

        // Resolve successors into identifiers, possibly adding dangling nodes
        let num_keys = nodes.len();
        let mut offsets = Vec::with_capacity(num_keys + 1);
        let mut succ_ids = Vec::new();
        offsets.push(0);
        for succ in &adjacency {
            for v in succ {
                let id = match ids.get(v).copied() {
                    Some(id) => id,
                    None => match self.unknown_nodes {
                        UnknownNodes::Reject => return Err(RankError::unknown_node(v)),
                        UnknownNodes::AsDangling => {
                            nodes.push(v.clone());
                            ids.insert(v.clone(), nodes.len() - 1);
                            nodes.len() - 1
                        }
                    },
                };
                succ_ids.push(id);
            }
            offsets.push(succ_ids.len());
        }
        let added = nodes.len() - num_keys;
        offsets.extend(std::iter::repeat(succ_ids.len()).take(added));
        if added > 0 {
            log::debug!("Added {} dangling nodes without adjacency records", added);
        }

        let (pred_offsets, pred) = transpose(nodes.len(), &offsets, &succ_ids);
        let dangling = (0..nodes.len())
            .filter(|&i| offsets[i] == offsets[i + 1])
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(AdjacencyGraph {
            ids,
            nodes: nodes.into_boxed_slice(),
            offsets: offsets.into_boxed_slice(),
            succ: succ_ids.into_boxed_slice(),
            pred_offsets,
            pred,
            dangling,
            unknown_nodes: self.unknown_nodes,
        })
    }
}

/// Computes the predecessor lists by a counting sort on targets.
///
/// Since sources are scanned in increasing order, each predecessor list is
/// sorted.
fn transpose(n: usize, offsets: &[usize], succ: &[usize]) -> (Box<[usize]>, Box<[usize]>) {
    let mut pred_offsets = vec![0; n + 1];
    for &v in succ {
        pred_offsets[v + 1] += 1;
    }
    for i in 0..n {
        pred_offsets[i + 1] += pred_offsets[i];
    }
    let mut cursor = pred_offsets[..n].to_vec();
    let mut pred = vec![0; succ.len()];
    for u in 0..n {
        for &v in &succ[offsets[u]..offsets[u + 1]] {
            pred[cursor[v]] = u;
            cursor[v] += 1;
        }
    }
    (pred_offsets.into_boxed_slice(), pred.into_boxed_slice())
}

/// An immutable directed graph whose nodes are arbitrary hashable values.
///
/// The graph is the only source of structural information of a PageRank
/// computation: it never changes after [construction](GraphBuilder::build),
/// so it can be shared by any number of threads.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<N> {
    /// Maps nodes to their identifier.
    ids: HashMap<N, usize>,
    /// Maps identifiers to nodes.
    nodes: Box<[N]>,
    /// Successors of node `i` are `succ[offsets[i]..offsets[i + 1]]`.
    offsets: Box<[usize]>,
    succ: Box<[usize]>,
    /// Predecessors of node `i` are `pred[pred_offsets[i]..pred_offsets[i + 1]]`.
    pred_offsets: Box<[usize]>,
    pred: Box<[usize]>,
    /// The sorted list of dangling nodes.
    dangling: Box<[usize]>,
    unknown_nodes: UnknownNodes,
}

impl<N: Eq + Hash> PartialEq for AdjacencyGraph<N> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.offsets == other.offsets
            && self.succ == other.succ
            && self.unknown_nodes == other.unknown_nodes
    }
}

impl<N: Eq + Hash> Eq for AdjacencyGraph<N> {}

impl<N: Eq + Hash + Clone + Debug> AdjacencyGraph<N> {
    /// Builds a graph rejecting unknown nodes.
    ///
    /// This is a shorthand for [`GraphBuilder::new().build(records)`](GraphBuilder::build).
    pub fn build<I, S>(records: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = (N, S)>,
        S: IntoIterator<Item = N>,
    {
        GraphBuilder::new().build(records)
    }

    /// Returns the identifier of a node, if the node is in the graph.
    #[inline(always)]
    pub fn node_id(&self, node: &N) -> Option<usize> {
        self.ids.get(node).copied()
    }

    /// Returns the ordered out-neighbors of a node.
    ///
    /// If the node is not in the graph, the result depends on the
    /// [policy](UnknownNodes) of the graph: under
    /// [`Reject`](UnknownNodes::Reject) an [`UnknownNode`](RankError::UnknownNode)
    /// error is returned, whereas under [`AsDangling`](UnknownNodes::AsDangling)
    /// the node has no out-neighbors.
    pub fn neighbors_of(
        &self,
        node: &N,
    ) -> Result<impl ExactSizeIterator<Item = &N> + '_, RankError> {
        let succ: &[usize] = match self.node_id(node) {
            Some(id) => self.successors(id),
            None => match self.unknown_nodes {
                UnknownNodes::Reject => return Err(RankError::unknown_node(node)),
                UnknownNodes::AsDangling => &[],
            },
        };
        Ok(succ.iter().map(move |&v| &self.nodes[v]))
    }
}

impl<N> AdjacencyGraph<N> {
    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of arcs, after deduplication.
    #[inline(always)]
    pub fn num_arcs(&self) -> u64 {
        self.succ.len() as u64
    }

    /// Returns the node with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not smaller than the number of nodes.
    #[inline(always)]
    pub fn node(&self, id: usize) -> &N {
        &self.nodes[id]
    }

    /// Returns all nodes, in identifier order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &N> + '_ {
        self.nodes.iter()
    }

    /// Returns the identifiers of the successors of a node, in record order.
    #[inline(always)]
    pub fn successors(&self, id: usize) -> &[usize] {
        &self.succ[self.offsets[id]..self.offsets[id + 1]]
    }

    /// Returns the identifiers of the predecessors of a node, in increasing
    /// order.
    #[inline(always)]
    pub fn predecessors(&self, id: usize) -> &[usize] {
        &self.pred[self.pred_offsets[id]..self.pred_offsets[id + 1]]
    }

    /// Returns the outdegree of a node.
    #[inline(always)]
    pub fn outdegree(&self, id: usize) -> usize {
        self.offsets[id + 1] - self.offsets[id]
    }

    /// Returns whether a node has no out-neighbors.
    #[inline(always)]
    pub fn is_dangling(&self, id: usize) -> bool {
        self.outdegree(id) == 0
    }

    /// Returns the identifiers of dangling nodes, in increasing order.
    pub fn dangling_nodes(&self) -> &[usize] {
        &self.dangling
    }

    /// Returns the policy for unknown nodes this graph was built with.
    pub fn unknown_nodes(&self) -> UnknownNodes {
        self.unknown_nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose() {
        // 0 -> 1, 2; 1 -> 2; 2 -> 0, 2
        let offsets = [0, 2, 3, 5];
        let succ = [1, 2, 2, 0, 2];
        let (pred_offsets, pred) = transpose(3, &offsets, &succ);
        assert_eq!(&*pred_offsets, &[0, 1, 2, 5]);
        assert_eq!(&*pred, &[2, 0, 0, 1, 2]);
    }

    #[test]
    fn test_repeated_successors() -> Result<(), RankError> {
        let g = AdjacencyGraph::build([(0, vec![1, 1, 0, 1]), (1, vec![])])?;
        assert_eq!(g.successors(0), &[1, 0]);
        assert_eq!(g.num_arcs(), 2);
        Ok(())
    }
}
