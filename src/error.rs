/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Errors of the ranking engine.
//!
//! All errors are fatal to the current computation: there is no partial
//! result for PageRank, as an incomplete normalization invalidates the
//! probability-mass invariant. Nodes are reported using their [`Debug`]
//! representation, so that the error type does not depend on the type of node
//! identifiers.

use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// The same node appears in two adjacency records with different
    /// successors.
    #[error("Node {node} has conflicting adjacency records: {first} and {second}")]
    InvalidGraph {
        node: String,
        first: String,
        second: String,
    },
    /// A node that is not part of the graph.
    #[error("Unknown node {node}")]
    UnknownNode { node: String },
    /// The graph has no nodes, so there is no distribution to compute.
    #[error("The graph has no nodes")]
    EmptyGraph,
}

impl RankError {
    pub(crate) fn unknown_node(node: &impl Debug) -> Self {
        RankError::UnknownNode {
            node: format!("{node:?}"),
        }
    }

    pub(crate) fn invalid_graph(
        node: &impl Debug,
        first: &impl Debug,
        second: &impl Debug,
    ) -> Self {
        RankError::InvalidGraph {
            node: format!("{node:?}"),
            first: format!("{first:?}"),
            second: format!("{second:?}"),
        }
    }
}
