//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{
    FilePattern, LoaderOptions, ScanConfig, ScoringMode, ScoringOptions, DEFAULT_MAX_ITERATIONS,
};

/// episcan - Scan batches of genotype datasets for markers associated with a binary class
#[derive(Parser, Debug)]
#[command(name = "episcan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the numbered dataset files
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Dataset file name pattern with an index placeholder: {i} or zero-padded {i:03}
    #[arg(short, long, default_value = "P_{i:03}.csv")]
    pub pattern: FilePattern,

    /// First dataset index (inclusive)
    #[arg(long, default_value = "1")]
    pub start: u32,

    /// Last dataset index (inclusive)
    #[arg(long, default_value = "100")]
    pub end: u32,

    /// Scoring mode: "contingency" (chi-squared, default), "two-sample" (t test),
    /// "regression" (logistic Wald test) or "mutual-information" (maximum MI)
    #[arg(short, long, default_value = "contingency")]
    pub mode: ScoringMode,

    /// Subset size: 1 = single markers, 2 = pairs, 3 = triplets.
    /// Pairs and triplets are supported by contingency and mutual-information modes.
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub k: u8,

    /// Significance level on Benjamini-Hochberg adjusted p-values (0.0 to 1.0).
    /// Ignored by mutual-information mode, which keeps the maximum.
    #[arg(short, long, default_value = "0.05", value_parser = validate_alpha)]
    pub alpha: f64,

    /// Number of leading marker columns used for pairs and triplets.
    /// Defaults to 50 for pairs and 30 for triplets; single markers always use every column.
    #[arg(long)]
    pub marker_window: Option<usize>,

    /// Name of the binary class label column
    #[arg(short, long, default_value = "Class")]
    pub class_column: String,

    /// Field delimiter of the dataset files
    #[arg(long, default_value = ",", value_parser = validate_separator)]
    pub separator: u8,

    /// Skip datasets whose marker count differs from this value
    #[arg(long)]
    pub expected_markers: Option<usize>,

    /// Apply Yates' continuity correction to 2x2 contingency tables
    #[arg(long, default_value = "false")]
    pub yates: bool,

    /// Iteration cap for the logistic regression fit
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Worker threads for scanning datasets (default: one per CPU core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Output CSV path. Defaults to the input directory with a
    /// 'scan_<mode>_k<k>.csv' name; a JSON report is written next to it.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert tab-delimited <prefix>_NNN.txt files into comma-delimited <prefix>_NNN.csv files
    Convert {
        /// Directory holding the .txt files
        #[arg(long)]
        input_dir: PathBuf,

        /// Directory for the .csv files (created if missing)
        #[arg(long)]
        output_dir: PathBuf,

        /// File name prefix before the _NNN index
        #[arg(long)]
        prefix: String,

        /// First file index (inclusive)
        #[arg(long, default_value = "1")]
        start: u32,

        /// Last file index (inclusive)
        #[arg(long, default_value = "100")]
        end: u32,
    },
}

impl Cli {
    /// Get the input directory, if one was given
    pub fn input(&self) -> Option<&PathBuf> {
        self.input_dir.as_ref()
    }

    /// Get the output path, deriving it from the input directory if not explicitly provided
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let input = self.input_dir.as_ref()?;
        Some(input.join(format!("scan_{}_k{}.csv", self.mode, self.k)))
    }

    /// JSON report path: the output path with a .json extension
    pub fn report_path(&self) -> Option<PathBuf> {
        self.output_path().map(|p| p.with_extension("json"))
    }

    /// Scan settings from the command line
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            mode: self.mode,
            k: usize::from(self.k),
            marker_window: self.marker_window,
            alpha: self.alpha,
            options: ScoringOptions {
                continuity_correction: self.yates,
                max_iterations: self.max_iterations,
            },
        }
    }

    /// Dataset parsing settings from the command line
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            class_column: self.class_column.clone(),
            separator: self.separator,
            infer_schema_length: self.infer_schema_length,
            expected_markers: self.expected_markers,
        }
    }

    /// Whether an existing output would be overwritten
    pub fn output_exists(&self) -> bool {
        self.output_path()
            .as_deref()
            .map(Path::exists)
            .unwrap_or(false)
    }
}

/// Validator for alpha parameter
fn validate_alpha(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("alpha must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for separator parameter: a single ASCII character, or "tab"
fn validate_separator(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "separator must be a single ASCII character or 'tab', got '{}'",
                s
            )),
        },
    }
}
