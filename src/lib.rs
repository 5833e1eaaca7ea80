/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
// for now we don't need any new feature but we might remove this in the future
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod graphs;
pub mod rank;
pub mod utils;

pub mod prelude {
    pub use crate::error::RankError;
    pub use crate::graphs::adjacency_graph::{AdjacencyGraph, GraphBuilder, UnknownNodes};
    pub use crate::graphs::samples::Sample;
    pub use crate::rank::pagerank::preds;
    pub use crate::rank::{
        propagate, run, Config, ConvergenceMonitor, Criterion, MonitorState, PageRank,
        Propagation, RankTable, RunResult, Termination,
    };
    pub use crate::utils::Granularity;
}
