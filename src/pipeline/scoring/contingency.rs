//! Pearson chi-squared test of independence on a feature × class contingency table

use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::NotScoreable;
use crate::pipeline::encoder::EncodedColumn;

/// Observed counts of an encoded feature against the class codes.
///
/// Only categories that actually occur among complete rows become table rows, and
/// only classes that occur become table columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    pub counts: Vec<Vec<f64>>,
}

impl ContingencyTable {
    /// Cross-tabulate `feature` against `class`, dropping rows without a feature code
    pub fn from_codes(feature: &EncodedColumn, class: &[u32]) -> Self {
        let n_classes = class.iter().copied().max().map(|m| m as usize + 1).unwrap_or(0);
        let mut full = vec![vec![0.0f64; n_classes]; feature.levels];

        for (code, &c) in feature.codes.iter().zip(class.iter()) {
            if let Some(code) = code {
                full[*code as usize][c as usize] += 1.0;
            }
        }

        // Drop empty rows and empty columns, as a crosstab of the observed data would
        let occupied_cols: Vec<usize> = (0..n_classes)
            .filter(|&j| full.iter().any(|row| row[j] > 0.0))
            .collect();

        let counts = full
            .into_iter()
            .filter(|row| row.iter().any(|&v| v > 0.0))
            .map(|row| occupied_cols.iter().map(|&j| row[j]).collect())
            .collect();

        Self { counts }
    }

    pub fn n_rows(&self) -> usize {
        self.counts.len()
    }

    pub fn n_cols(&self) -> usize {
        self.counts.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.n_rows().saturating_sub(1) * self.n_cols().saturating_sub(1)
    }

    /// Pearson statistic from observed and expected cell counts.
    ///
    /// With `yates` set and one degree of freedom, each observed count is moved up to
    /// 0.5 towards its expected count first.
    pub fn chi_squared_statistic(&self, yates: bool) -> f64 {
        let row_totals: Vec<f64> = self.counts.iter().map(|r| r.iter().sum()).collect();
        let col_totals: Vec<f64> = (0..self.n_cols())
            .map(|j| self.counts.iter().map(|r| r[j]).sum())
            .collect();
        let total: f64 = row_totals.iter().sum();

        if total == 0.0 {
            return 0.0;
        }

        let correct = yates && self.degrees_of_freedom() == 1;
        let mut statistic = 0.0;

        for (i, row) in self.counts.iter().enumerate() {
            for (j, &observed) in row.iter().enumerate() {
                let expected = row_totals[i] * col_totals[j] / total;
                if expected == 0.0 {
                    continue;
                }
                let mut diff = observed - expected;
                if correct {
                    diff = diff.signum() * (diff.abs() - 0.5).max(0.0);
                }
                statistic += diff * diff / expected;
            }
        }

        statistic
    }
}

/// Chi-squared test of independence between an encoded feature and the class.
///
/// Returns the p-value of the upper tail with (rows - 1) × (cols - 1) degrees of
/// freedom. A table with a single class column has no degrees of freedom and gives
/// p = 1. Fewer than two feature categories makes the subset unscoreable.
pub fn chi_squared_test(
    feature: &EncodedColumn,
    class: &[u32],
    yates: bool,
) -> Result<f64, NotScoreable> {
    let table = ContingencyTable::from_codes(feature, class);

    if table.n_rows() < 2 {
        return Err(NotScoreable::DegenerateTable {
            rows: table.n_rows(),
        });
    }

    let dof = table.degrees_of_freedom();
    if dof == 0 {
        return Ok(1.0);
    }

    let statistic = table.chi_squared_statistic(yates);
    chi_squared_survival(statistic, dof)
}

/// Upper tail probability of the chi-squared distribution
fn chi_squared_survival(statistic: f64, dof: usize) -> Result<f64, NotScoreable> {
    if !statistic.is_finite() {
        return Err(NotScoreable::UndefinedStatistic);
    }

    let dist = ChiSquared::new(dof as f64).map_err(|_| NotScoreable::UndefinedStatistic)?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}
