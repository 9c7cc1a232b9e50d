//! Batch orchestration: scan a range of datasets in parallel
//!
//! Each dataset index is an independent unit of work. Failures to provide a dataset
//! become skip entries; they never abort the batch.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;

use super::loader::DatasetProvider;
use super::scan::{scan_dataset, DatasetResult, ScanConfig};

/// What happened to one dataset of the batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DatasetOutcome {
    Scanned(DatasetResult),
    Skipped { reason: String },
}

/// One dataset of the batch, identified by its index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetEntry {
    pub index: u32,
    pub name: String,
    #[serde(flatten)]
    pub outcome: DatasetOutcome,
}

impl DatasetEntry {
    pub fn status(&self) -> &'static str {
        match self.outcome {
            DatasetOutcome::Scanned(_) => "scanned",
            DatasetOutcome::Skipped { .. } => "skipped",
        }
    }

    pub fn result(&self) -> Option<&DatasetResult> {
        match &self.outcome {
            DatasetOutcome::Scanned(result) => Some(result),
            DatasetOutcome::Skipped { .. } => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&str> {
        match &self.outcome {
            DatasetOutcome::Scanned(_) => None,
            DatasetOutcome::Skipped { reason } => Some(reason),
        }
    }
}

/// All dataset entries of a batch, in index order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub config: ScanConfig,
    pub entries: Vec<DatasetEntry>,
}

impl BatchResult {
    pub fn requested(&self) -> usize {
        self.entries.len()
    }

    pub fn scanned(&self) -> usize {
        self.entries.iter().filter(|e| e.result().is_some()).count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &DatasetEntry> {
        self.entries.iter().filter(|e| e.result().is_none())
    }

    /// Datasets with at least one selected subset
    pub fn with_selection(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.result())
            .filter(|r| !r.selection.is_empty())
            .count()
    }

    pub fn total_selected(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.result())
            .map(|r| r.selection.selected_count())
            .sum()
    }
}

/// Destination of a finished batch
pub trait ResultSink {
    fn write(&mut self, batch: &BatchResult) -> Result<()>;
}

/// Load and scan every index of `range`, returning entries in index order.
///
/// The progress bar, when given, is advanced once per dataset.
pub fn run_batch(
    provider: &dyn DatasetProvider,
    range: RangeInclusive<u32>,
    config: &ScanConfig,
    progress: Option<&ProgressBar>,
) -> BatchResult {
    let entries: Vec<DatasetEntry> = range
        .into_par_iter()
        .map(|index| {
            let outcome = match provider.load(index) {
                Ok(dataset) => DatasetOutcome::Scanned(scan_dataset(&dataset, config)),
                Err(e) => DatasetOutcome::Skipped {
                    reason: e.to_string(),
                },
            };

            if let Some(pb) = progress {
                pb.inc(1);
            }

            DatasetEntry {
                index,
                name: provider.name(index),
                outcome,
            }
        })
        .collect();

    BatchResult {
        config: config.clone(),
        entries,
    }
}

/// Worker pool for a batch; `None` uses rayon's default size
pub fn build_thread_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().context("Failed to build worker pool")
}
