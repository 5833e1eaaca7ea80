/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by power-method propagation.
//!
//! A computation alternates a [propagation step](propagate), which computes a
//! new [`RankTable`] from the previous one, and a check by a
//! [`ConvergenceMonitor`], which decides whether to stop. The
//! [`PageRank`] driver (or the [`run`] function) sequences the two and
//! returns a [`RunResult`].

mod monitor;
pub mod pagerank;
mod propagate;
mod table;

pub use monitor::{ConvergenceMonitor, Criterion, MonitorState, Termination};
pub use pagerank::{run, Config, PageRank, RunResult};
pub use propagate::{propagate, Propagation};
pub use table::RankTable;
