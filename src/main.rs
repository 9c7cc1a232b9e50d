//! episcan: combinatorial marker association scanner CLI
//!
//! Scans a numbered range of genotype datasets and writes the surviving
//! marker subsets of each dataset to a CSV table and a JSON report.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use episcan::cli::{confirm_overwrite, convert::run_convert, Cli, Commands};
use episcan::pipeline::{build_thread_pool, run_batch, FileDatasetProvider, ResultSink};
use episcan::report::{BatchSummary, CsvResultSink, JsonReportSink, ReportSource};
use episcan::utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_warning, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Convert {
                input_dir,
                output_dir,
                prefix,
                start,
                end,
            } => run_convert(input_dir, output_dir, prefix, *start, *end),
        };
    }

    // Main scan - require input directory
    let input_dir = cli.input().cloned().ok_or_else(|| {
        anyhow::anyhow!("Input directory is required. Use -i/--input-dir to specify one.")
    })?;
    if !input_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", input_dir.display());
    }

    if cli.start > cli.end {
        anyhow::bail!(
            "Start index ({}) must not exceed end index ({})",
            cli.start,
            cli.end
        );
    }

    let config = cli.scan_config();
    config.validate()?;

    let output_path = cli
        .output_path()
        .context("Could not derive an output path")?;
    let report_path = cli
        .report_path()
        .context("Could not derive a report path")?;

    if !cli.no_confirm && cli.output_exists() && !confirm_overwrite(&output_path)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    let pattern = cli.pattern.to_string();
    print_config(&ConfigCard {
        input_dir: &input_dir,
        pattern: &pattern,
        start: cli.start,
        end: cli.end,
        class_column: &cli.class_column,
        output: &output_path,
        config: &config,
    });

    let run_start = Instant::now();

    // Step 1: Scan datasets
    print_step_header(1, "Scan Datasets");

    let step_start = Instant::now();
    let provider = FileDatasetProvider::new(&input_dir, cli.pattern.clone(), cli.loader_options());
    let pool = build_thread_pool(cli.threads)?;

    let requested = u64::from(cli.end - cli.start) + 1;
    let pb = create_progress_bar(requested, "Scanning");
    let batch = pool.install(|| run_batch(&provider, cli.start..=cli.end, &config, Some(&pb)));

    let skipped: Vec<_> = batch.skipped().collect();
    if skipped.is_empty() {
        finish_with_success(&pb, &format!("Scanned {} dataset(s)", batch.scanned()));
    } else {
        finish_with_warning(
            &pb,
            &format!(
                "Scanned {} of {} dataset(s)",
                batch.scanned(),
                batch.requested()
            ),
        );
        for entry in &skipped {
            print_warning(&format!(
                "Skipped {}: {}",
                entry.name,
                entry.skip_reason().unwrap_or("unknown reason")
            ));
        }
    }

    if batch.with_selection() == 0 {
        print_info("No dataset produced a selection");
    } else {
        print_count(
            "dataset(s) with a selection",
            batch.with_selection(),
            Some(&format!("({})", config.policy())),
        );
    }
    print_step_time(step_start.elapsed());

    // Step 2: Save results
    print_step_header(2, "Save Results");

    let step_start = Instant::now();
    let spinner = create_spinner("Writing results...");
    CsvResultSink::new(&output_path).write(&batch)?;
    JsonReportSink::new(
        &report_path,
        ReportSource {
            input_dir: input_dir.display().to_string(),
            file_pattern: pattern,
            start: cli.start,
            end: cli.end,
        },
    )
    .write(&batch)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    print_info(&format!("Report: {}", report_path.display()));
    print_step_time(step_start.elapsed());

    // Display summary
    BatchSummary::from_batch(&batch, run_start.elapsed()).display();

    // Final completion message
    print_completion();

    Ok(())
}
