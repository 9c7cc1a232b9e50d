//! Selection of the surviving subsets of one dataset

use serde::Serialize;

use super::scan::{CorrectedScoreRecord, ScoreRecord};

/// Separator between subsets in the flat identifier list
const SUBSET_LIST_SEPARATOR: &str = ", ";

/// Rule used to pick the surviving subsets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Keep every subset whose adjusted p-value is below `alpha`
    Threshold { alpha: f64 },
    /// Keep the single highest-scoring subset
    Maximum,
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionPolicy::Threshold { alpha } => write!(f, "adjusted p < {}", alpha),
            SelectionPolicy::Maximum => write!(f, "maximum score"),
        }
    }
}

/// Surviving subsets of one dataset. An empty result is still a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selection {
    /// Threshold policy: zero or more significant subsets, in enumeration order
    Significant { subsets: Vec<CorrectedScoreRecord> },
    /// Maximum policy: the best subset, or none when nothing was scoreable
    Maximum { best: Option<ScoreRecord> },
}

impl Selection {
    pub fn selected_count(&self) -> usize {
        match self {
            Selection::Significant { subsets } => subsets.len(),
            Selection::Maximum { best } => usize::from(best.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected_count() == 0
    }

    /// Comma-joined identifiers of the selected subsets (`M1+M3` for a pair)
    pub fn identifiers(&self) -> String {
        match self {
            Selection::Significant { subsets } => subsets
                .iter()
                .map(|r| r.subset.to_string())
                .collect::<Vec<_>>()
                .join(SUBSET_LIST_SEPARATOR),
            Selection::Maximum { best } => best
                .as_ref()
                .map(|r| r.subset.to_string())
                .unwrap_or_default(),
        }
    }

    /// Score reported next to the identifiers: the maximum's raw score
    pub fn score(&self) -> Option<f64> {
        match self {
            Selection::Significant { .. } => None,
            Selection::Maximum { best } => best.as_ref().map(|r| r.score),
        }
    }
}

/// Subsets whose adjusted p-value is strictly below `alpha`.
///
/// Adjusted p-values never exceed 1, so `alpha >= 1` keeps the whole family.
pub fn select_significant(records: &[CorrectedScoreRecord], alpha: f64) -> Vec<CorrectedScoreRecord> {
    records
        .iter()
        .filter(|r| alpha >= 1.0 || r.adjusted < alpha)
        .cloned()
        .collect()
}

/// The record with the strictly greatest score; the earliest record wins ties
pub fn select_maximum(records: &[ScoreRecord]) -> Option<ScoreRecord> {
    let mut best: Option<&ScoreRecord> = None;
    for record in records {
        match best {
            Some(current) if record.score <= current.score => {}
            _ => best = Some(record),
        }
    }
    best.cloned()
}
