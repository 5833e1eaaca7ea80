/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Size of the node partitions processed by a single parallel task.
///
/// A propagation step cuts the node range into consecutive partitions of the
/// same size; each partition is handled by a single Rayon task and its partial
/// results are combined in partition order, so the outcome does not depend on
/// the number of threads. The size can be given directly as a number of nodes,
/// or tentatively as a number of arcs, in which case it is converted using the
/// average outdegree of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Granularity {
    /// Each partition contains the specified number of nodes.
    Nodes(usize),
    /// Each partition contains a number of nodes whose sum of outdegrees is,
    /// on average, the specified number of arcs.
    Arcs(u64),
}

impl core::default::Default for Granularity {
    /// Returns a default granularity of 1000 nodes.
    fn default() -> Self {
        Self::Nodes(1000)
    }
}

impl Granularity {
    /// Returns the number of nodes of a partition for a graph with the given
    /// number of nodes and arcs.
    ///
    /// The result is always at least one.
    pub fn node_granularity(&self, num_nodes: usize, num_arcs: u64) -> usize {
        match self {
            Self::Nodes(n) => (*n).max(1),
            Self::Arcs(n) => {
                let average_degree = num_arcs as f64 / num_nodes.max(1) as f64;
                if average_degree == 0.0 {
                    return num_nodes.max(1);
                }
                (*n as f64 / average_degree)
                    .min(usize::MAX as f64)
                    .ceil()
                    .max(1.0) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_granularity() {
        assert_eq!(Granularity::Nodes(10).node_granularity(100, 1000), 10);
        assert_eq!(Granularity::Nodes(0).node_granularity(100, 1000), 1);
        // Average degree 10
        assert_eq!(Granularity::Arcs(100).node_granularity(100, 1000), 10);
        assert_eq!(Granularity::Arcs(1).node_granularity(100, 1000), 1);
        // No arcs: a single partition
        assert_eq!(Granularity::Arcs(100).node_granularity(5, 0), 5);
    }
}
