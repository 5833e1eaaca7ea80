/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

pub mod adjacency_graph;
pub mod adjacency_list;
pub mod samples;

pub mod prelude {
    pub use super::adjacency_graph::{AdjacencyGraph, GraphBuilder, UnknownNodes};
    pub use super::adjacency_list::AdjacencyListOptions;
    pub use super::samples::Sample;
}
