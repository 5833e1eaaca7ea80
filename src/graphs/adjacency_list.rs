/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Reading adjacency records from text.
//!
//! Each non-empty, non-comment line describes a record: the first field is a
//! node, and the remaining fields are its out-neighbors, in order. A line
//! containing just a node describes a dangling node. Fields are separated by
//! a given character, or by whitespace if no separator is specified; empty
//! fields are ignored.
//!
//! ```text
//! # the "dangle" graph
//! L1 L2 L4
//! L2 L3 L5
//! L3 L4
//! L4
//! L5 L1 L2 L3
//! ```

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Options for parsing adjacency lists.
#[derive(Debug, Clone)]
pub struct AdjacencyListOptions {
    /// Lines starting with this symbol are ignored.
    pub line_comment_symbol: char,
    /// The field separator; if `None`, fields are separated by whitespace.
    pub separator: Option<char>,
    /// How many records to skip at the start, ignoring comment and empty lines.
    pub lines_to_skip: usize,
    /// How many records to read, after skipping.
    pub max_records: Option<usize>,
}

impl Default for AdjacencyListOptions {
    fn default() -> Self {
        Self {
            line_comment_symbol: '#',
            separator: None,
            lines_to_skip: 0,
            max_records: None,
        }
    }
}

/// An adjacency record with string nodes.
pub type Record = (String, Vec<String>);

/// Parses adjacency records from a reader.
pub fn read_records(reader: impl BufRead, options: &AdjacencyListOptions) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut skipped = 0;
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Could not read line {}", line_num + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(options.line_comment_symbol) {
            continue;
        }
        if skipped < options.lines_to_skip {
            skipped += 1;
            continue;
        }
        if let Some(max_records) = options.max_records {
            if records.len() >= max_records {
                break;
            }
        }

        let fields: Box<dyn Iterator<Item = &str>> = match options.separator {
            Some(separator) => Box::new(line.split(separator)),
            None => Box::new(line.split_whitespace()),
        };
        let mut fields = fields.map(str::trim).filter(|f| !f.is_empty());
        // A line made only of separators
        let Some(node) = fields.next() else {
            continue;
        };
        records.push((node.to_owned(), fields.map(str::to_owned).collect()));
    }
    log::info!("Read {} adjacency records", records.len());
    Ok(records)
}

/// Parses adjacency records from a file.
pub fn load(path: impl AsRef<Path>, options: &AdjacencyListOptions) -> Result<Vec<Record>> {
    let path = path.as_ref();
    log::info!("Reading adjacency lists from {}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;
    read_records(BufReader::new(file), options)
        .with_context(|| format!("Could not parse adjacency lists from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() -> Result<()> {
        let text = "# comment\n\nL1 L2\tL4\nL4\n  L5   L1  \n";
        let records = read_records(text.as_bytes(), &AdjacencyListOptions::default())?;
        assert_eq!(
            records,
            vec![
                ("L1".to_owned(), vec!["L2".to_owned(), "L4".to_owned()]),
                ("L4".to_owned(), vec![]),
                ("L5".to_owned(), vec!["L1".to_owned()]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_separator_and_limits() -> Result<()> {
        let text = "%header\na,b,c\nb,,a\nc\nd,a\n";
        let options = AdjacencyListOptions {
            line_comment_symbol: '%',
            separator: Some(','),
            lines_to_skip: 1,
            max_records: Some(2),
        };
        let records = read_records(text.as_bytes(), &options)?;
        assert_eq!(
            records,
            vec![
                ("b".to_owned(), vec!["a".to_owned()]),
                ("c".to_owned(), vec![]),
            ]
        );
        Ok(())
    }
}
