/*
 * SPDX-FileCopyrightText: 2026 The webrank authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "cli")]

use anyhow::Result;
use webrank::cli::cli_main;

#[test]
fn test_sample() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("ranks.tsv");
    cli_main([
        "webrank",
        "pagerank",
        "--sample",
        "book",
        "--sort",
        "-j",
        "2",
        "-o",
        output.to_str().unwrap(),
    ])?;
    let content = std::fs::read_to_string(&output)?;
    let nodes: Vec<&str> = content
        .lines()
        .map(|line| line.split('\t').next().unwrap())
        .collect();
    assert_eq!(nodes, vec!["L5", "L4", "L3", "L2", "L1"]);
    Ok(())
}

#[test]
fn test_input_file() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("graph.txt");
    std::fs::write(&input, "a b c\nb c\n")?;
    let output = dir.path().join("ranks.json");

    // "c" is unknown, so the graph is rejected unless it is added as dangling
    assert!(cli_main([
        "webrank",
        "pagerank",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .is_err());

    cli_main([
        "webrank",
        "pagerank",
        input.to_str().unwrap(),
        "--unknown-nodes",
        "as-dangling",
        "--alpha",
        "0.15",
        "--tolerance",
        "-0.001",
        "--fmt",
        "json",
        "--precision",
        "6",
        "-o",
        output.to_str().unwrap(),
    ])?;
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array[0]["node"], "a");
    let sum: f64 = array.iter().map(|x| x["rank"].as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() < 1E-5);
    Ok(())
}

#[test]
fn test_invalid_alpha() {
    assert!(cli_main(["webrank", "pagerank", "--sample", "dangle", "-a", "1.0"]).is_err());
}
