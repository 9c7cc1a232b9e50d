//! Association scoring of a marker subset against the binary class label
//!
//! Every scoring mode either returns a raw score (a p-value, or mutual information
//! in nats) or reports why the subset cannot be scored. Unscoreable subsets are left
//! out of the p-value family instead of being given a placeholder score.

pub mod contingency;
pub mod mutual_info;
pub mod regression;
pub mod two_sample;

use serde::Serialize;
use thiserror::Error;

use super::encoder::{encode_subset, MissingPolicy};

pub use contingency::chi_squared_test;
pub use mutual_info::mutual_information;
pub use regression::logistic_wald_test;
pub use two_sample::students_t_test;

/// Default iteration cap for the logistic regression fit
pub const DEFAULT_MAX_ITERATIONS: usize = 35;

/// Statistic used to score a marker subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    /// Pearson chi-squared test of independence on the contingency table (default)
    #[default]
    Contingency,
    /// Student's two-sample t test on the marker values split by class
    TwoSample,
    /// Wald test of the slope in a single-predictor logistic regression
    Regression,
    /// Empirical mutual information between the joint feature and the class
    MutualInformation,
}

impl ScoringMode {
    /// Whether the mode produces p-values (and therefore needs correction)
    pub fn produces_p_values(&self) -> bool {
        !matches!(self, ScoringMode::MutualInformation)
    }

    /// Whether the mode can score joint features of several markers
    pub fn supports_joint_features(&self) -> bool {
        matches!(self, ScoringMode::Contingency | ScoringMode::MutualInformation)
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringMode::Contingency => write!(f, "contingency"),
            ScoringMode::TwoSample => write!(f, "two-sample"),
            ScoringMode::Regression => write!(f, "regression"),
            ScoringMode::MutualInformation => write!(f, "mutual-information"),
        }
    }
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "contingency" | "chi2" | "chi-squared" => Ok(ScoringMode::Contingency),
            "two-sample" | "ttest" | "t-test" => Ok(ScoringMode::TwoSample),
            "regression" | "logistic" => Ok(ScoringMode::Regression),
            "mutual-information" | "mi" => Ok(ScoringMode::MutualInformation),
            _ => Err(format!(
                "Unknown scoring mode: '{}'. Use 'contingency', 'two-sample', 'regression' or 'mutual-information'.",
                s
            )),
        }
    }
}

/// Tunables shared by the scoring modes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringOptions {
    /// Apply Yates' continuity correction to 2x2 contingency tables
    pub continuity_correction: bool,
    /// Iteration cap for the logistic regression fit
    pub max_iterations: usize,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            continuity_correction: false,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Reason a subset could not be scored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotScoreable {
    #[error("fewer than 2 non-missing values ({found})")]
    TooFewValues { found: usize },

    #[error("contingency table has {rows} row categories")]
    DegenerateTable { rows: usize },

    #[error("class group {class} has {size} non-missing values")]
    InsufficientGroup { class: u32, size: usize },

    #[error("pooled variance is zero")]
    ZeroVariance,

    #[error("predictor has fewer than 2 distinct values")]
    ConstantPredictor,

    #[error("predictor perfectly separates the classes")]
    PerfectSeparation,

    #[error("fit did not converge within {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("information matrix is singular")]
    SingularFit,

    #[error("{mode} scoring needs exactly one marker, got {markers}")]
    JointFeatureUnsupported { mode: ScoringMode, markers: usize },

    #[error("statistic is undefined")]
    UndefinedStatistic,
}

impl NotScoreable {
    /// Short stable label used when counting exclusions
    pub fn label(&self) -> &'static str {
        match self {
            NotScoreable::TooFewValues { .. } => "too_few_values",
            NotScoreable::DegenerateTable { .. } => "degenerate_table",
            NotScoreable::InsufficientGroup { .. } => "insufficient_group",
            NotScoreable::ZeroVariance => "zero_variance",
            NotScoreable::ConstantPredictor => "constant_predictor",
            NotScoreable::PerfectSeparation => "perfect_separation",
            NotScoreable::NoConvergence { .. } => "no_convergence",
            NotScoreable::SingularFit => "singular_fit",
            NotScoreable::JointFeatureUnsupported { .. } => "joint_feature_unsupported",
            NotScoreable::UndefinedStatistic => "undefined_statistic",
        }
    }
}

/// Score one marker subset against the class codes.
///
/// # Arguments
/// * `members` - Raw values of each marker in the subset, one slice per marker
/// * `class` - Class code (0 or 1) per row
/// * `mode` - Statistic to compute
/// * `options` - Scoring tunables
///
/// # Returns
/// A p-value for the test modes, mutual information (nats) for
/// [`ScoringMode::MutualInformation`].
pub fn score_subset<S: AsRef<str>>(
    members: &[&[Option<S>]],
    class: &[u32],
    mode: ScoringMode,
    options: &ScoringOptions,
) -> Result<f64, NotScoreable> {
    let score = match mode {
        ScoringMode::Contingency => {
            let joint = encode_subset(members, MissingPolicy::Exclude)?;
            chi_squared_test(&joint, class, options.continuity_correction)?
        }
        ScoringMode::MutualInformation => {
            let joint = encode_subset(members, MissingPolicy::AsCategory)?;
            mutual_information(&joint, class)
        }
        ScoringMode::TwoSample => {
            let values = single_numeric_member(members, mode)?;
            students_t_test(&values, class)?
        }
        ScoringMode::Regression => {
            let values = single_numeric_member(members, mode)?;
            logistic_wald_test(&values, class, options.max_iterations)?
        }
    };

    if score.is_nan() {
        return Err(NotScoreable::UndefinedStatistic);
    }
    Ok(score)
}

/// Parse the only member of a single-marker subset as numbers.
/// Values that do not parse are treated as missing.
fn single_numeric_member<S: AsRef<str>>(
    members: &[&[Option<S>]],
    mode: ScoringMode,
) -> Result<Vec<Option<f64>>, NotScoreable> {
    match members {
        [values] => Ok(values
            .iter()
            .map(|v| v.as_ref().and_then(|s| s.as_ref().trim().parse::<f64>().ok()))
            .collect()),
        _ => Err(NotScoreable::JointFeatureUnsupported {
            mode,
            markers: members.len(),
        }),
    }
}
