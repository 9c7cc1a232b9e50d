//! Student's two-sample t test of a numeric marker split by class

use statrs::distribution::{ContinuousCDF, StudentsT};

use super::NotScoreable;

/// Minimum non-missing values per class group
const MIN_GROUP_SIZE: usize = 2;

/// Two-sided equal-variance t test of the marker means in class 0 and class 1.
///
/// Missing values are excluded for this marker only. Each group needs at least two
/// values, and the pooled variance must be positive.
pub fn students_t_test(values: &[Option<f64>], class: &[u32]) -> Result<f64, NotScoreable> {
    let group = |label: u32| -> Vec<f64> {
        values
            .iter()
            .zip(class.iter())
            .filter(|(_, &c)| c == label)
            .filter_map(|(v, _)| *v)
            .collect()
    };

    let group0 = group(0);
    let group1 = group(1);

    for (label, g) in [(0u32, &group0), (1u32, &group1)] {
        if g.len() < MIN_GROUP_SIZE {
            return Err(NotScoreable::InsufficientGroup {
                class: label,
                size: g.len(),
            });
        }
    }

    let (mean0, ss0) = mean_and_sum_of_squares(&group0);
    let (mean1, ss1) = mean_and_sum_of_squares(&group1);
    let n0 = group0.len() as f64;
    let n1 = group1.len() as f64;

    let dof = n0 + n1 - 2.0;
    let pooled_variance = (ss0 + ss1) / dof;
    if pooled_variance <= 0.0 {
        return Err(NotScoreable::ZeroVariance);
    }

    let standard_error = (pooled_variance * (1.0 / n0 + 1.0 / n1)).sqrt();
    let t_stat = (mean0 - mean1) / standard_error;
    if !t_stat.is_finite() {
        return Err(NotScoreable::UndefinedStatistic);
    }

    let dist = StudentsT::new(0.0, 1.0, dof).map_err(|_| NotScoreable::UndefinedStatistic)?;
    let p_value = 2.0 * dist.sf(t_stat.abs());

    Ok(p_value.clamp(0.0, 1.0))
}

/// Mean and sum of squared deviations, two-pass for stability
fn mean_and_sum_of_squares(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss = values.iter().map(|x| (x - mean).powi(2)).sum();
    (mean, ss)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|&v| Some(v)).collect()
    }

    #[test]
    fn test_identical_groups_p_one() {
        let values = some(&[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        let class = [0, 0, 0, 1, 1, 1];

        let p = students_t_test(&values, &class).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_t_statistic() {
        // means 1 and 3, each group variance 1, n = 3 per group:
        // t = -2 / sqrt(1 * (2/3)) = -2.449, dof = 4, two-sided p ~ 0.0705
        let values = some(&[0.0, 1.0, 2.0, 2.0, 3.0, 4.0]);
        let class = [0, 0, 0, 1, 1, 1];

        let p = students_t_test(&values, &class).unwrap();
        assert!((p - 0.0705).abs() < 1e-3, "p = {}", p);
    }

    #[test]
    fn test_missing_values_excluded() {
        let values = vec![Some(0.0), None, Some(1.0), Some(5.0), Some(6.0), None];
        let class = [0, 0, 0, 1, 1, 1];

        let p = students_t_test(&values, &class).unwrap();
        assert!(p < 0.05);
    }

    #[test]
    fn test_small_group_not_scoreable() {
        let values = vec![Some(0.0), Some(1.0), Some(2.0), None, None, Some(3.0)];
        let class = [0, 0, 0, 1, 1, 1];

        let result = students_t_test(&values, &class);
        assert_eq!(result, Err(NotScoreable::InsufficientGroup { class: 1, size: 1 }));
    }

    #[test]
    fn test_zero_variance_not_scoreable() {
        let values = some(&[1.0, 1.0, 1.0, 1.0]);
        let class = [0, 0, 1, 1];

        assert_eq!(students_t_test(&values, &class), Err(NotScoreable::ZeroVariance));
    }
}
