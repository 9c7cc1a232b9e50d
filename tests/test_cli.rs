//! Tests for CLI argument parsing and end-to-end runs of the binary

use assert_cmd::Command;
use clap::Parser;
use episcan::cli::{Cli, Commands};
use episcan::pipeline::ScoringMode;
use predicates::prelude::*;
use std::path::PathBuf;

mod common;

use common::*;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["episcan", "-i", "data"]);

    assert_eq!(cli.mode, ScoringMode::Contingency);
    assert_eq!(cli.k, 1);
    assert_eq!(cli.alpha, 0.05);
    assert_eq!(cli.start, 1);
    assert_eq!(cli.end, 100);
    assert_eq!(cli.class_column, "Class");
    assert_eq!(cli.separator, b',');
    assert_eq!(cli.max_iterations, 35);
    assert_eq!(cli.pattern.file_name(5), "P_005.csv");
    assert!(!cli.yates);
    assert!(!cli.no_confirm);
    assert!(cli.marker_window.is_none());
    assert_eq!(cli.infer_schema_length, 10000);
}

#[test]
fn test_cli_scan_config() {
    let cli = Cli::parse_from([
        "episcan",
        "-i",
        "data",
        "--mode",
        "mi",
        "-k",
        "3",
        "--marker-window",
        "12",
        "--yates",
        "--max-iterations",
        "50",
    ]);

    let config = cli.scan_config();
    assert_eq!(config.mode, ScoringMode::MutualInformation);
    assert_eq!(config.k, 3);
    assert_eq!(config.window(), Some(12));
    assert!(config.options.continuity_correction);
    assert_eq!(config.options.max_iterations, 50);
    assert!(config.validate().is_ok());
}

#[test]
fn test_cli_output_path_derivation() {
    let cli = Cli::parse_from(["episcan", "-i", "/path/to/data", "-m", "mi", "-k", "2"]);

    assert_eq!(
        cli.output_path().unwrap(),
        PathBuf::from("/path/to/data/scan_mutual-information_k2.csv")
    );
    assert_eq!(
        cli.report_path().unwrap(),
        PathBuf::from("/path/to/data/scan_mutual-information_k2.json")
    );
}

#[test]
fn test_cli_explicit_output_path() {
    let cli = Cli::parse_from(["episcan", "-i", "data", "-o", "/tmp/results.csv"]);
    assert_eq!(cli.output_path().unwrap(), PathBuf::from("/tmp/results.csv"));
    assert_eq!(cli.report_path().unwrap(), PathBuf::from("/tmp/results.json"));
}

#[test]
fn test_cli_no_input_no_output_path() {
    let cli = Cli::parse_from(["episcan"]);
    assert!(cli.input().is_none());
    assert!(cli.output_path().is_none());
}

#[test]
fn test_cli_separator_parsing() {
    let cli = Cli::parse_from(["episcan", "--separator", "tab"]);
    assert_eq!(cli.separator, b'\t');

    let cli = Cli::parse_from(["episcan", "--separator", ";"]);
    assert_eq!(cli.separator, b';');

    assert!(Cli::try_parse_from(["episcan", "--separator", ";;"]).is_err());
}

#[test]
fn test_cli_rejects_invalid_values() {
    assert!(Cli::try_parse_from(["episcan", "--alpha", "1.5"]).is_err());
    assert!(Cli::try_parse_from(["episcan", "--alpha", "abc"]).is_err());
    assert!(Cli::try_parse_from(["episcan", "-k", "4"]).is_err());
    assert!(Cli::try_parse_from(["episcan", "-k", "0"]).is_err());
    assert!(Cli::try_parse_from(["episcan", "--mode", "anova"]).is_err());
    assert!(Cli::try_parse_from(["episcan", "--pattern", "data.csv"]).is_err());
}

#[test]
fn test_cli_convert_subcommand() {
    let cli = Cli::parse_from([
        "episcan",
        "convert",
        "--input-dir",
        "txt",
        "--output-dir",
        "csv",
        "--prefix",
        "position1_EDM-2",
        "--end",
        "20",
    ]);

    match cli.command {
        Some(Commands::Convert {
            input_dir,
            output_dir,
            prefix,
            start,
            end,
            ..
        }) => {
            assert_eq!(input_dir, PathBuf::from("txt"));
            assert_eq!(output_dir, PathBuf::from("csv"));
            assert_eq!(prefix, "position1_EDM-2");
            assert_eq!(start, 1);
            assert_eq!(end, 20);
        }
        other => panic!("expected convert subcommand, got {:?}", other),
    }
}

#[test]
fn test_binary_scans_directory() {
    let temp_dir = create_dataset_dir(vec![
        (1, create_perfect_marker_dataframe()),
        (2, create_constant_markers_dataframe()),
    ]);

    Command::cargo_bin("episcan")
        .unwrap()
        .args(["-i", temp_dir.path().to_str().unwrap()])
        .args(["--start", "1", "--end", "3", "--alpha", "0.1", "--no-confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped P_003.csv"))
        .stdout(predicate::str::contains("SCAN SUMMARY"));

    let output = temp_dir.path().join("scan_contingency_k1.csv");
    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "dataset,file,status,selection,score,scoreable,tested,note");
    assert!(lines[1].starts_with("1,P_001.csv,scanned,M2,"));
    assert!(lines[3].starts_with("3,P_003.csv,skipped,"));

    assert!(temp_dir.path().join("scan_contingency_k1.json").exists());
}

#[test]
fn test_binary_rejects_pairs_for_regression() {
    let temp_dir = create_dataset_dir(vec![(1, create_numeric_dataframe())]);

    Command::cargo_bin("episcan")
        .unwrap()
        .args(["-i", temp_dir.path().to_str().unwrap()])
        .args(["--mode", "regression", "-k", "2", "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("single markers"));
}

#[test]
fn test_binary_requires_input_directory() {
    Command::cargo_bin("episcan")
        .unwrap()
        .arg("--no-confirm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input directory is required"));
}

#[test]
fn test_binary_rejects_reversed_range() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("episcan")
        .unwrap()
        .args(["-i", temp_dir.path().to_str().unwrap()])
        .args(["--start", "5", "--end", "2", "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not exceed"));
}
