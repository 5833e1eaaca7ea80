/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use std::io::Write;
use webrank::graphs::adjacency_list::{load, AdjacencyListOptions};
use webrank::prelude::*;

#[test]
fn test_load() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("book.txt");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "# the book graph")?;
    writeln!(file, "L1 L2 L4")?;
    writeln!(file, "L2 L3 L5")?;
    writeln!(file)?;
    writeln!(file, "L3 L4")?;
    writeln!(file, "L4 L5")?;
    writeln!(file, "L5 L1 L2 L3")?;
    writeln!(file, "L5 L1 L2 L3")?;
    drop(file);

    let records = load(&path, &AdjacencyListOptions::default())?;
    assert_eq!(records.len(), 6);
    let graph = AdjacencyGraph::build(records)?;
    let book = Sample::Book.graph()?;
    assert_eq!(graph.num_nodes(), book.num_nodes());
    assert_eq!(graph.num_arcs(), book.num_arcs());

    let result = PageRank::new(&graph).run()?;
    let expected = PageRank::new(&book).run()?;
    assert_eq!(result.iterations, expected.iterations);
    assert_eq!(result.ranks.as_slice(), expected.ranks.as_slice());
    Ok(())
}

#[test]
fn test_csv() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("graph.csv");
    std::fs::write(&path, "source,targets\na, b\nb,\n")?;

    let options = AdjacencyListOptions {
        separator: Some(','),
        lines_to_skip: 1,
        ..Default::default()
    };
    let records = load(&path, &options)?;
    assert_eq!(
        records,
        vec![
            ("a".to_owned(), vec!["b".to_owned()]),
            ("b".to_owned(), vec![])
        ]
    );
    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load(dir.path().join("missing.txt"), &AdjacencyListOptions::default()).is_err());
}
