/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::cli::{
    get_thread_pool, AdjacencyListArgs, GlobalArgs, GranularityArgs, NumThreadsArg,
    RankVectorFormat,
};
use crate::graphs::adjacency_graph::{GraphBuilder, UnknownNodes};
use crate::graphs::adjacency_list::{self, Record};
use crate::graphs::samples::Sample;
use crate::rank::{Criterion, PageRank};
use anyhow::{ensure, Context, Result};
use clap::Parser;
use dsi_progress_logger::{progress_logger, ProgressLog};
use std::path::PathBuf;

/// A built-in sample graph.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum CliSample {
    /// Five pages L1, …, L5, none of them dangling.
    Book,
    /// The book graph in which L4 has no out-neighbors.
    Dangle,
    /// The book graph with the record of L5 appearing twice.
    Repeat,
}

impl From<CliSample> for Sample {
    fn from(s: CliSample) -> Self {
        match s {
            CliSample::Book => Sample::Book,
            CliSample::Dangle => Sample::Dangle,
            CliSample::Repeat => Sample::Repeat,
        }
    }
}

/// The stopping criterion.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub enum CliCriterion {
    /// Compare the rank of the reference node between iterations.
    #[default]
    ReferenceNode,
    /// Compare the ℓ₁ norm of the difference between successive rank vectors.
    L1Norm,
}

impl From<CliCriterion> for Criterion {
    fn from(c: CliCriterion) -> Self {
        match c {
            CliCriterion::ReferenceNode => Criterion::ReferenceNode,
            CliCriterion::L1Norm => Criterion::L1Norm,
        }
    }
}

/// How to handle targets that do not appear as sources.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub enum CliUnknownNodes {
    /// Fail with an error.
    #[default]
    Reject,
    /// Add them to the graph as dangling nodes.
    AsDangling,
}

impl From<CliUnknownNodes> for UnknownNodes {
    fn from(u: CliUnknownNodes) -> Self {
        match u {
            CliUnknownNodes::Reject => UnknownNodes::Reject,
            CliUnknownNodes::AsDangling => UnknownNodes::AsDangling,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pagerank",
    about = "Compute PageRank by power-method iteration.",
    long_about = None
)]
pub struct CliArgs {
    #[arg(required_unless_present = "sample", conflicts_with = "sample")]
    /// A file of adjacency lists: each record is a node followed by its
    /// out-neighbors.
    pub input: Option<PathBuf>,

    #[arg(long, value_enum)]
    /// Use a built-in sample graph instead of an input file.
    pub sample: Option<CliSample>,

    #[clap(flatten)]
    pub adjacency: AdjacencyListArgs,

    #[arg(long, value_enum, default_value_t = CliUnknownNodes::Reject)]
    /// How to handle targets that never appear as sources.
    pub unknown_nodes: CliUnknownNodes,

    #[arg(short, long, default_value_t = 0.0)]
    /// The random-jump probability α (must be in the interval [0 . . 1)).
    pub alpha: f64,

    #[arg(long, default_value_t = 10)]
    /// Maximum number of iterations.
    pub max_iter: usize,

    #[arg(short, long, default_value_t = 0.01, allow_negative_numbers = true)]
    /// The tolerance; only its absolute value is used.
    pub tolerance: f64,

    #[arg(short, long)]
    /// The reference node (default: the first node of the graph).
    pub reference: Option<String>,

    #[arg(long, value_enum, default_value_t = CliCriterion::ReferenceNode)]
    /// The stopping criterion.
    pub criterion: CliCriterion,

    #[arg(short, long)]
    /// Where to store the ranks (default: standard output).
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RankVectorFormat::Ascii)]
    /// The output format for the ranks.
    pub fmt: RankVectorFormat,

    #[arg(long)]
    /// Output nodes by decreasing rank instead of in input order.
    pub sort: bool,

    #[arg(long)]
    /// Decimal digits for output ranks.
    pub precision: Option<usize>,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub granularity: GranularityArgs,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(
        // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
        (0.0..1.0).contains(&args.alpha),
        "The random-jump probability must be in [0 . . 1), got {}",
        args.alpha
    );
    ensure!(
        args.max_iter > 0,
        "The maximum number of iterations must be positive"
    );
    ensure!(!args.tolerance.is_nan(), "The tolerance cannot be NaN");

    let records: Vec<Record> = match (&args.input, args.sample) {
        (_, Some(sample)) => {
            let sample = Sample::from(sample);
            log::info!("Using the {} sample graph", sample);
            sample
                .records()
                .into_iter()
                .map(|(node, succ)| {
                    (
                        node.to_owned(),
                        succ.into_iter().map(str::to_owned).collect(),
                    )
                })
                .collect()
        }
        (Some(input), None) => adjacency_list::load(input, &(&args.adjacency).into())?,
        (None, None) => anyhow::bail!("Either an input file or a sample graph must be specified"),
    };

    let graph = GraphBuilder::new()
        .unknown_nodes(args.unknown_nodes.into())
        .build(records)
        .context("Could not build the graph")?;

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;

    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut pr = PageRank::new(&graph);
    pr.alpha(args.alpha)
        .max_iter(args.max_iter)
        .tolerance(args.tolerance)
        .reference(args.reference.clone())
        .criterion(args.criterion.into())
        .granularity((&args.granularity).into());

    let result = thread_pool
        .install(|| pr.run_with_logging(&mut pl))
        .context("PageRank computation failed")?;

    let ranks = if args.sort {
        result.ranks.sorted_desc()
    } else {
        result.ranks.iter().collect()
    };
    args.fmt
        .store(args.output.as_deref(), &ranks, args.precision)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_sample_help() -> Result<()> {
        for cli_sample in CliSample::value_variants() {
            let sample = Sample::from(*cli_sample);
            let possible_value = cli_sample
                .to_possible_value()
                .context("Missing possible value")?;
            assert_eq!(possible_value.get_name(), sample.to_string());
            let help = possible_value
                .get_help()
                .context("Missing help")?
                .to_string();
            let graph = sample.graph()?;
            match sample {
                Sample::Book => {
                    assert!(graph.dangling_nodes().is_empty());
                    assert!(help.contains("none of them dangling"));
                }
                Sample::Dangle => {
                    assert_eq!(graph.dangling_nodes(), &[graph.node_id(&"L4").unwrap()]);
                    assert!(help.contains("L4 has no out-neighbors"));
                }
                Sample::Repeat => {
                    assert_eq!(sample.records().len(), 6);
                    assert!(help.contains("L5 appearing twice"));
                }
            }
        }
        Ok(())
    }
}
