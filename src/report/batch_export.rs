//! Batch result sinks: per-dataset CSV table and JSON report
//!
//! The CSV has one row per dataset index. The JSON report carries the run
//! metadata plus every dataset entry with its selected subsets and exclusions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{
    BatchResult, DatasetEntry, ResultSink, ScanConfig, SelectionPolicy,
};

/// Writes one CSV row per dataset
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    path: PathBuf,
}

impl CsvResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvResultSink {
    fn write(&mut self, batch: &BatchResult) -> Result<()> {
        let mut df = batch_to_dataframe(batch)?;
        let mut file = std::fs::File::create(&self.path)
            .with_context(|| format!("Failed to create output file: {}", self.path.display()))?;
        CsvWriter::new(&mut file)
            .finish(&mut df)
            .with_context(|| format!("Failed to write CSV file: {}", self.path.display()))?;
        Ok(())
    }
}

/// Flatten a batch into the `dataset, file, status, selection, score, scoreable,
/// tested, note` table
pub fn batch_to_dataframe(batch: &BatchResult) -> Result<DataFrame> {
    let n = batch.entries.len();
    let mut indices: Vec<u32> = Vec::with_capacity(n);
    let mut files: Vec<String> = Vec::with_capacity(n);
    let mut statuses: Vec<&str> = Vec::with_capacity(n);
    let mut selections: Vec<Option<String>> = Vec::with_capacity(n);
    let mut scores: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut scoreable: Vec<Option<u64>> = Vec::with_capacity(n);
    let mut tested: Vec<Option<u64>> = Vec::with_capacity(n);
    let mut notes: Vec<Option<String>> = Vec::with_capacity(n);

    for entry in &batch.entries {
        indices.push(entry.index);
        files.push(entry.name.clone());
        statuses.push(entry.status());

        match entry.result() {
            Some(result) => {
                selections.push(Some(result.selection.identifiers()));
                scores.push(result.selection.score());
                scoreable.push(Some(result.scoreable as u64));
                tested.push(Some(result.tested as u64));
                notes.push(exclusion_note(entry));
            }
            None => {
                selections.push(None);
                scores.push(None);
                scoreable.push(None);
                tested.push(None);
                notes.push(entry.skip_reason().map(str::to_string));
            }
        }
    }

    let df = DataFrame::new(vec![
        Column::new("dataset".into(), indices),
        Column::new("file".into(), files),
        Column::new("status".into(), statuses),
        Column::new("selection".into(), selections),
        Column::new("score".into(), scores),
        Column::new("scoreable".into(), scoreable),
        Column::new("tested".into(), tested),
        Column::new("note".into(), notes),
    ])?;

    Ok(df)
}

/// `excluded degenerate_table=3; too_few_values=1`, or nothing when every subset scored
fn exclusion_note(entry: &DatasetEntry) -> Option<String> {
    let result = entry.result()?;
    if result.excluded.is_empty() {
        return None;
    }
    let parts: Vec<String> = result
        .excluded
        .iter()
        .map(|(reason, count)| format!("{}={}", reason, count))
        .collect();
    Some(format!("excluded {}", parts.join("; ")))
}

/// Where the batch came from, for the report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportSource {
    pub input_dir: String,
    pub file_pattern: String,
    pub start: u32,
    pub end: u32,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub episcan_version: String,
    pub source: ReportSource,
    pub config: ScanConfig,
    pub policy: SelectionPolicy,
    pub marker_window: Option<usize>,
}

/// Batch-level counts
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub datasets_requested: usize,
    pub datasets_scanned: usize,
    pub datasets_skipped: usize,
    pub datasets_with_selection: usize,
    pub subsets_selected: usize,
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport<'a> {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub datasets: &'a [DatasetEntry],
}

impl<'a> ScanReport<'a> {
    pub fn new(batch: &'a BatchResult, source: ReportSource) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                episcan_version: env!("CARGO_PKG_VERSION").to_string(),
                source,
                config: batch.config.clone(),
                policy: batch.config.policy(),
                marker_window: batch.config.window(),
            },
            summary: ReportSummary {
                datasets_requested: batch.requested(),
                datasets_scanned: batch.scanned(),
                datasets_skipped: batch.skipped().count(),
                datasets_with_selection: batch.with_selection(),
                subsets_selected: batch.total_selected(),
            },
            datasets: &batch.entries,
        }
    }
}

/// Writes the JSON report
#[derive(Debug, Clone)]
pub struct JsonReportSink {
    path: PathBuf,
    source: ReportSource,
}

impl JsonReportSink {
    pub fn new(path: impl Into<PathBuf>, source: ReportSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for JsonReportSink {
    fn write(&mut self, batch: &BatchResult) -> Result<()> {
        let report = ScanReport::new(batch, self.source.clone());
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize scan report to JSON")?;

        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write scan report: {}", self.path.display()))?;

        Ok(())
    }
}
