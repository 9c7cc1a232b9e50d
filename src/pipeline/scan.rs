//! Per-dataset scan: enumerate subsets, score, correct and select
//!
//! The steps run strictly in sequence for one dataset: correction needs the complete
//! p-value family and selection needs the corrected values.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use super::combinations::{effective_window, marker_window, Combinations, MAX_SUBSET_SIZE};
use super::correction::benjamini_hochberg;
use super::dataset::{Dataset, MarkerColumn};
use super::scoring::{score_subset, ScoringMode, ScoringOptions};
use super::selection::{select_maximum, select_significant, Selection, SelectionPolicy};

/// Default significance level for the threshold policy
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Separator between marker names of a multi-marker subset
const SUBSET_MEMBER_SEPARATOR: &str = "+";

/// A set of markers scored jointly, in column order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Subset {
    markers: Vec<String>,
}

impl Subset {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl std::fmt::Display for Subset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.markers.join(SUBSET_MEMBER_SEPARATOR))
    }
}

/// Raw score of one scoreable subset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub subset: Subset,
    pub score: f64,
}

/// Raw and Benjamini-Hochberg adjusted p-value of one scoreable subset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectedScoreRecord {
    pub subset: Subset,
    pub raw: f64,
    pub adjusted: f64,
}

/// Settings for scanning one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanConfig {
    /// Statistic used to score each subset
    pub mode: ScoringMode,
    /// Subset size (1 = single markers, 2 = pairs, 3 = triplets)
    pub k: usize,
    /// Leading marker window for k > 1; defaults apply when unset
    pub marker_window: Option<usize>,
    /// Significance level on adjusted p-values (ignored by the maximum policy)
    pub alpha: f64,
    /// Scoring tunables
    pub options: ScoringOptions,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScoringMode::default(),
            k: 1,
            marker_window: None,
            alpha: DEFAULT_ALPHA,
            options: ScoringOptions::default(),
        }
    }
}

impl ScanConfig {
    /// Check the combination of settings before any dataset is touched
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 || self.k > MAX_SUBSET_SIZE {
            anyhow::bail!(
                "Subset size k must be between 1 and {}, got {}",
                MAX_SUBSET_SIZE,
                self.k
            );
        }

        if self.k > 1 && !self.mode.supports_joint_features() {
            anyhow::bail!(
                "Scoring mode '{}' scores single markers only (k = 1), got k = {}",
                self.mode,
                self.k
            );
        }

        if !(0.0..=1.0).contains(&self.alpha) {
            anyhow::bail!("Significance level must be between 0.0 and 1.0, got {}", self.alpha);
        }

        if let Some(window) = self.marker_window {
            if window < self.k {
                anyhow::bail!(
                    "Marker window ({}) must be at least the subset size ({})",
                    window,
                    self.k
                );
            }
        }

        if self.options.max_iterations == 0 {
            anyhow::bail!("Iteration cap must be at least 1");
        }

        Ok(())
    }

    /// Selection rule implied by the scoring mode
    pub fn policy(&self) -> SelectionPolicy {
        if self.mode.produces_p_values() {
            SelectionPolicy::Threshold { alpha: self.alpha }
        } else {
            SelectionPolicy::Maximum
        }
    }

    /// Marker window actually applied to this scan
    pub fn window(&self) -> Option<usize> {
        effective_window(self.k, self.marker_window)
    }
}

/// All scores of one dataset before correction
#[derive(Debug, Clone, Default)]
pub struct ScoreFamily {
    /// One record per scoreable subset, in enumeration order
    pub records: Vec<ScoreRecord>,
    /// Number of enumerated subsets
    pub tested: usize,
    /// Unscoreable subsets counted by reason
    pub excluded: BTreeMap<String, usize>,
}

/// Final outcome of scanning one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetResult {
    /// Number of enumerated subsets
    pub tested: usize,
    /// Number of subsets in the scored family
    pub scoreable: usize,
    /// Unscoreable subsets counted by reason
    pub excluded: BTreeMap<String, usize>,
    /// Surviving subsets
    pub selection: Selection,
}

/// Enumerate and score every subset of the windowed marker list
pub fn score_family(dataset: &Dataset, config: &ScanConfig) -> ScoreFamily {
    let markers: &[MarkerColumn] = marker_window(&dataset.markers, config.window());
    let combinations = Combinations::new(markers.len(), config.k);
    let mut family = ScoreFamily::default();

    for indices in combinations.iter() {
        family.tested += 1;

        let members: Vec<&[Option<String>]> =
            indices.iter().map(|&i| markers[i].values.as_slice()).collect();

        match score_subset(&members, &dataset.class.codes, config.mode, &config.options) {
            Ok(score) => family.records.push(ScoreRecord {
                subset: Subset::new(indices.iter().map(|&i| markers[i].name.clone()).collect()),
                score,
            }),
            Err(reason) => {
                *family.excluded.entry(reason.label().to_string()).or_insert(0) += 1;
            }
        }
    }

    family
}

/// Attach Benjamini-Hochberg adjusted p-values to a p-value family
pub fn correct_family(records: &[ScoreRecord]) -> Vec<CorrectedScoreRecord> {
    let raw: Vec<f64> = records.iter().map(|r| r.score).collect();
    let adjusted = benjamini_hochberg(&raw);

    records
        .iter()
        .zip(adjusted)
        .map(|(record, adjusted)| CorrectedScoreRecord {
            subset: record.subset.clone(),
            raw: record.score,
            adjusted,
        })
        .collect()
}

/// Scan one dataset from enumeration through selection
pub fn scan_dataset(dataset: &Dataset, config: &ScanConfig) -> DatasetResult {
    let family = score_family(dataset, config);

    let selection = match config.policy() {
        SelectionPolicy::Threshold { alpha } => {
            let corrected = correct_family(&family.records);
            Selection::Significant {
                subsets: select_significant(&corrected, alpha),
            }
        }
        SelectionPolicy::Maximum => Selection::Maximum {
            best: select_maximum(&family.records),
        },
    };

    DatasetResult {
        tested: family.tested,
        scoreable: family.records.len(),
        excluded: family.excluded,
        selection,
    }
}
