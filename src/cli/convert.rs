//! Tab-delimited text to CSV conversion for a numbered range of files

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use polars::prelude::*;

use crate::pipeline::read_raw_table;
use crate::utils::{create_spinner, print_success, print_warning};

/// Outcome of converting a range of files
#[derive(Debug, Default)]
pub struct ConvertSummary {
    pub converted: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// `<prefix>_NNN<extension>` with a three-digit zero-padded index
pub fn numbered_file_name(prefix: &str, index: u32, extension: &str) -> String {
    format!("{}_{:03}.{}", prefix, index, extension)
}

/// Convert every `<prefix>_NNN.txt` in `input_dir` to `<prefix>_NNN.csv` in `output_dir`.
///
/// Missing inputs and files that fail to parse are recorded and skipped; only a failure
/// to create the output directory is an error.
pub fn convert_range(
    input_dir: &Path,
    output_dir: &Path,
    prefix: &str,
    range: RangeInclusive<u32>,
) -> Result<ConvertSummary> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let mut summary = ConvertSummary::default();

    for index in range {
        let txt_path = input_dir.join(numbered_file_name(prefix, index, "txt"));
        let csv_path = output_dir.join(numbered_file_name(prefix, index, "csv"));

        if !txt_path.exists() {
            summary.missing.push(txt_path);
            continue;
        }

        match convert_file(&txt_path, &csv_path) {
            Ok(()) => summary.converted.push(csv_path),
            Err(e) => summary.failed.push((txt_path, format!("{:#}", e))),
        }
    }

    Ok(summary)
}

/// Rewrite one tab-delimited file as CSV, keeping every cell as written
fn convert_file(txt_path: &Path, csv_path: &Path) -> Result<()> {
    let mut df = read_raw_table(txt_path, b'\t')?;
    let mut file = std::fs::File::create(csv_path)
        .with_context(|| format!("Failed to create output file: {}", csv_path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(false)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", csv_path.display()))?;
    Ok(())
}

/// Run the convert subcommand with terminal output
pub fn run_convert(
    input_dir: &Path,
    output_dir: &Path,
    prefix: &str,
    start: u32,
    end: u32,
) -> Result<()> {
    println!(
        "\n {} Converting tab-delimited text to CSV",
        style("◆").cyan().bold()
    );
    println!(
        "   Input:  {}",
        style(input_dir.join(numbered_file_name(prefix, start, "txt")).display()).dim()
    );
    println!("   Output: {}", style(output_dir.display()).dim());
    println!("   Range:  {}..={}", start, end);
    println!();

    let spinner = create_spinner("Converting files...");
    let summary = convert_range(input_dir, output_dir, prefix, start..=end)?;
    spinner.finish_and_clear();

    for path in &summary.missing {
        print_warning(&format!("File not found: {}", path.display()));
    }
    for (path, reason) in &summary.failed {
        print_warning(&format!("Failed to convert {}: {}", path.display(), reason));
    }

    println!();
    println!(
        "   {} converted, {} missing, {} failed",
        style(summary.converted.len()).green(),
        style(summary.missing.len()).yellow(),
        style(summary.failed.len()).red()
    );
    print_success("Conversion complete!");

    Ok(())
}
