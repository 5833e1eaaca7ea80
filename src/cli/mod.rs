/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface.
//!
//! Each subcommand lives in its own module and exposes a `CliArgs` structure
//! and a `main` function; this module contains the arguments and utilities
//! shared by all subcommands.

use crate::graphs::adjacency_list::AdjacencyListOptions;
use crate::utils::Granularity;
use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Display;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::{Duration, Instant};

pub mod pagerank;

#[derive(Args, Debug)]
/// Shared CLI arguments for reading files containing adjacency lists.
pub struct AdjacencyListArgs {
    #[arg(long, default_value_t = '#')]
    /// Ignore lines that start with this symbol.
    pub line_comment_symbol: char,

    #[arg(long)]
    /// The field separator; fields are separated by whitespace if not
    /// specified.
    pub separator: Option<char>,

    #[arg(long, default_value_t = 0)]
    /// How many records to skip, ignoring comment and empty lines.
    pub lines_to_skip: usize,

    #[arg(long)]
    /// How many records to parse, after skipping the first lines_to_skip.
    pub max_records: Option<usize>,
}

impl From<&AdjacencyListArgs> for AdjacencyListOptions {
    fn from(args: &AdjacencyListArgs) -> Self {
        AdjacencyListOptions {
            line_comment_symbol: args.line_comment_symbol,
            separator: args.separator,
            lines_to_skip: args.lines_to_skip,
            max_records: args.max_records,
        }
    }
}

/// Returns the number of threads of the global Rayon pool.
fn default_num_threads() -> NonZeroUsize {
    NonZeroUsize::new(rayon::current_num_threads()).unwrap_or(NonZeroUsize::MIN)
}

/// The number of threads of the pool running a computation.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = default_num_threads())]
    /// The number of threads to use.
    pub num_threads: NonZeroUsize,
}

/// The size of the parallel tasks of a propagation step.
#[derive(Args, Debug)]
pub struct GranularityArgs {
    #[arg(long, conflicts_with("node_granularity"))]
    /// The tentative number of arcs in a parallel task (advanced option).
    pub arc_granularity: Option<u64>,

    #[arg(long, conflicts_with("arc_granularity"))]
    /// The number of nodes in a parallel task (advanced option).
    pub node_granularity: Option<usize>,
}

impl From<&GranularityArgs> for Granularity {
    fn from(args: &GranularityArgs) -> Self {
        args.node_granularity
            .map(Granularity::Nodes)
            .or(args.arc_granularity.map(Granularity::Arcs))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Formats for storing ranks.
pub enum RankVectorFormat {
    /// ASCII format, one node per line followed by a tab and its rank.
    Ascii,
    /// A JSON array of objects with fields `node` and `rank`.
    Json,
}

impl RankVectorFormat {
    /// Stores pairs (node, rank) at the specified `path`, or on standard
    /// output if `path` is `None`, using the format defined by `self`.
    ///
    /// If `precision` is specified, ranks are rounded to the given number of
    /// decimal digits.
    pub fn store<N: Display>(
        &self,
        path: Option<&Path>,
        ranks: &[(&N, f64)],
        precision: Option<usize>,
    ) -> Result<()> {
        let mut out: Box<dyn Write> = match path {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)
                        .with_context(|| format!("Could not create {}", dir.display()))?;
                }
                log::info!("Storing ranks in {:?} format at {}", self, path.display());
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Could not create {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        };

        match self {
            RankVectorFormat::Ascii => {
                for (node, rank) in ranks {
                    match precision {
                        None => writeln!(out, "{node}\t{rank}"),
                        Some(precision) => writeln!(out, "{node}\t{rank:.precision$}"),
                    }
                    .context("Could not write ranks")?;
                }
            }
            RankVectorFormat::Json => {
                let mut array = Vec::with_capacity(ranks.len());
                for (node, rank) in ranks {
                    let rank = match precision {
                        None => *rank,
                        Some(precision) => format!("{rank:.precision$}").parse::<f64>()?,
                    };
                    array.push(serde_json::json!({ "node": node.to_string(), "rank": rank }));
                }
                serde_json::to_writer_pretty(&mut out, &array).context("Could not write ranks")?;
                writeln!(out).context("Could not write ranks")?;
            }
        }
        out.flush().context("Could not write ranks")?;
        Ok(())
    }
}

/// Creates a [`ThreadPool`](rayon::ThreadPool) with the given number of threads.
pub fn get_thread_pool(num_threads: NonZeroUsize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads.get())
        .build()
        .context("Failed to create thread pool")?;
    log::info!("Using {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

/// Parses a duration such as `1h30m` or `2s500`.
///
/// Amounts may be followed by `d` (days), `h` (hours), `m` (minutes) or `s`
/// (seconds); a trailing amount without suffix is in milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    ensure!(
        !value.trim().is_empty(),
        "Empty duration (use 0 to log at every update)"
    );
    let mut total = Duration::ZERO;
    let mut amount = String::new();
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            amount.push(c);
            continue;
        }
        let unit_secs = match c {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => bail!("Invalid duration suffix: {c}"),
        };
        let amount_value: u64 = amount
            .parse()
            .with_context(|| format!("Missing amount before suffix {c}"))?;
        total += Duration::from_secs(amount_value * unit_secs);
        amount.clear();
    }
    if !amount.is_empty() {
        total += Duration::from_millis(amount.parse()?);
    }
    Ok(total)
}

/// Splits an elapsed time into days, hours, minutes, seconds and milliseconds.
fn elapsed_span(elapsed: Duration) -> jiff::Span {
    let secs = elapsed.as_secs() as i64;
    jiff::Span::new()
        .days(secs / (24 * 60 * 60))
        .hours(secs / (60 * 60) % 24)
        .minutes(secs / 60 % 60)
        .seconds(secs % 60)
        .milliseconds(elapsed.subsec_millis() as i64)
}

/// Installs an `env_logger` logger (default level `info`) whose records start
/// with a timestamp and the time elapsed since installation.
pub fn init_env_logger() -> Result<()> {
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};

    let start = Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} {} {style}{}{style:#} [{:?}] {} - {}",
                jiff::Timestamp::now().strftime("%F %T%.3f"),
                printer.span_to_string(&elapsed_span(start.elapsed())),
                record.level(),
                std::thread::current().id(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global = true, display_order = 1000)]
    /// How often to log the progress of iterations (default: 10s). Amounts
    /// take the suffixes "d", "h", "m" and "s"; a trailing amount without
    /// suffix is in milliseconds, so "1m30s500" is 90.5 seconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[clap(name = "pagerank", visible_alias = "pr")]
    PageRank(pagerank::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "webrank", version)]
/// Tools ranking the nodes of directed graphs.
///
/// Noteworthy environment variables:
///
/// - RUST_MIN_STACK: minimum thread stack size (in bytes).
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::PageRank(args) => {
            pagerank::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Formats seconds as days, hours and minutes followed by the remaining
/// seconds, plus the raw value.
fn pretty_print_elapsed(elapsed: f64) -> String {
    const UNITS: [(&str, u64); 3] = [("day", 24 * 60 * 60), ("hour", 60 * 60), ("minute", 60)];
    let mut rest = elapsed as u64;
    let mut result = String::new();
    for (name, unit_secs) in UNITS {
        let count = rest / unit_secs;
        rest %= unit_secs;
        match count {
            0 => {}
            1 => result.push_str(&format!("1 {name} ")),
            _ => result.push_str(&format!("{count} {name}s ")),
        }
    }
    result.push_str(&format!("{:.3} seconds ({elapsed}s)", elapsed % 60.0));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() -> Result<()> {
        assert_eq!(parse_duration("1500")?, Duration::from_millis(1500));
        assert_eq!(parse_duration("2m 3s")?, Duration::from_secs(123));
        assert_eq!(
            parse_duration("1d2h3m4s567")?,
            Duration::from_millis(93_784_567)
        );
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3x").is_err());
        assert!(parse_duration("m").is_err());
        Ok(())
    }

    #[test]
    fn test_elapsed_span() {
        let span = elapsed_span(Duration::from_millis(93_784_567));
        assert_eq!(span.get_days(), 1);
        assert_eq!(span.get_hours(), 2);
        assert_eq!(span.get_minutes(), 3);
        assert_eq!(span.get_seconds(), 4);
        assert_eq!(span.get_milliseconds(), 567);
    }

    #[test]
    fn test_granularity_args() {
        let args = GranularityArgs {
            arc_granularity: None,
            node_granularity: None,
        };
        assert_eq!(Granularity::from(&args), Granularity::default());
        let args = GranularityArgs {
            arc_granularity: Some(5000),
            node_granularity: None,
        };
        assert_eq!(Granularity::from(&args), Granularity::Arcs(5000));
    }

    #[test]
    fn test_num_threads() {
        let cli = Cli::try_parse_from(["webrank", "pagerank", "--sample", "book", "-j", "3"]);
        let Ok(Cli {
            command: SubCommands::PageRank(args),
            ..
        }) = cli
        else {
            panic!("Could not parse the arguments");
        };
        assert_eq!(args.num_threads.num_threads.get(), 3);
        assert!(Cli::try_parse_from(["webrank", "pagerank", "--sample", "book", "-j", "0"]).is_err());
    }

    #[test]
    fn test_pretty_print_elapsed() {
        assert_eq!(pretty_print_elapsed(1.5), "1.500 seconds (1.5s)");
        assert_eq!(
            pretty_print_elapsed(3723.0),
            "1 hour 2 minutes 3.000 seconds (3723s)"
        );
    }

    mod rank_vector_format {
        use super::*;

        #[test]
        fn test_ascii() -> Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("ranks.txt");
            let (a, b) = ("a".to_owned(), "b".to_owned());
            RankVectorFormat::Ascii.store(Some(&path), &[(&a, 0.75), (&b, 0.25)], None)?;
            let content = std::fs::read_to_string(&path)?;
            assert_eq!(content, "a\t0.75\nb\t0.25\n");
            Ok(())
        }

        #[test]
        fn test_ascii_with_precision() -> Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("sub").join("ranks.txt");
            let a = "a".to_owned();
            RankVectorFormat::Ascii.store(Some(&path), &[(&a, 1.0 / 3.0)], Some(3))?;
            assert_eq!(std::fs::read_to_string(&path)?, "a\t0.333\n");
            Ok(())
        }

        #[test]
        fn test_json() -> Result<()> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("ranks.json");
            let (a, b) = ("a".to_owned(), "b".to_owned());
            RankVectorFormat::Json.store(Some(&path), &[(&a, 0.75), (&b, 0.25)], None)?;
            let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            assert_eq!(
                value,
                serde_json::json!([
                    { "node": "a", "rank": 0.75 },
                    { "node": "b", "rank": 0.25 }
                ])
            );
            Ok(())
        }
    }
}
