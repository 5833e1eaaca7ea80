/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Small graphs simulating the output of a web crawler.
//!
//! All samples have the five nodes `L1`, …, `L5` of the classic textbook
//! example:
//!
//! - [`Book`](Sample::Book): `L1` → {`L2`, `L4`}, `L2` → {`L3`, `L5`},
//!   `L3` → {`L4`}, `L4` → {`L5`}, `L5` → {`L1`, `L2`, `L3`};
//! - [`Dangle`](Sample::Dangle): as [`Book`](Sample::Book), but `L4` has no
//!   out-neighbors;
//! - [`Repeat`](Sample::Repeat): as [`Book`](Sample::Book), but the record of
//!   `L5` appears twice, as if the crawler had visited the page twice.

use super::adjacency_graph::AdjacencyGraph;
use crate::error::RankError;

/// A sample graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Book,
    Dangle,
    Repeat,
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sample::Book => f.write_str("book"),
            Sample::Dangle => f.write_str("dangle"),
            Sample::Repeat => f.write_str("repeat"),
        }
    }
}

impl Sample {
    /// Returns the adjacency records of the sample, in crawl order.
    pub fn records(&self) -> Vec<(&'static str, Vec<&'static str>)> {
        let mut records = vec![
            ("L1", vec!["L2", "L4"]),
            ("L2", vec!["L3", "L5"]),
            ("L3", vec!["L4"]),
            ("L4", vec!["L5"]),
            ("L5", vec!["L1", "L2", "L3"]),
        ];
        match self {
            Sample::Book => {}
            Sample::Dangle => records[3].1.clear(),
            Sample::Repeat => records.push(("L5", vec!["L1", "L2", "L3"])),
        }
        records
    }

    /// Builds the sample graph.
    pub fn graph(&self) -> Result<AdjacencyGraph<&'static str>, RankError> {
        AdjacencyGraph::build(self.records())
    }
}
