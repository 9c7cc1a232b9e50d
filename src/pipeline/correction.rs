//! Multiple-testing correction of a dataset's p-value family

/// Benjamini-Hochberg adjusted p-values (false discovery rate).
///
/// The adjusted value at ascending rank `i` (1-based) is `min_{j >= i} p_(j) * m / j`,
/// clipped to 1. Results are returned in the input order. An empty family gives an
/// empty result.
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    if m == 0 {
        return Vec::new();
    }

    // Stable ascending order of ranks
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut adjusted = vec![0.0f64; m];
    let mut running_min = f64::INFINITY;

    // Walk from the largest rank down so each rank sees the minimum over j >= i
    for (rank, &idx) in order.iter().enumerate().rev() {
        let scaled = p_values[idx] * m as f64 / (rank + 1) as f64;
        running_min = running_min.min(scaled);
        adjusted[idx] = running_min.min(1.0);
    }

    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_family() {
        assert!(benjamini_hochberg(&[]).is_empty());
    }

    #[test]
    fn test_single_p_value_unchanged() {
        assert_eq!(benjamini_hochberg(&[0.03]), vec![0.03]);
    }

    #[test]
    fn test_known_adjustment() {
        // Sorted: 0.01, 0.02, 0.03, 0.04, 0.05 -> each scaled to 0.05
        let adjusted = benjamini_hochberg(&[0.05, 0.01, 0.04, 0.02, 0.03]);
        for value in adjusted {
            assert!((value - 0.05).abs() < 1e-12);
        }
    }

    #[test]
    fn test_restores_input_order() {
        let adjusted = benjamini_hochberg(&[0.5, 0.001, 0.2]);
        // ranks: 0.001 -> 0.003, 0.2 -> 0.3, 0.5 -> 0.5
        assert!((adjusted[0] - 0.5).abs() < 1e-12);
        assert!((adjusted[1] - 0.003).abs() < 1e-12);
        assert!((adjusted[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_step_up_minimum() {
        // 0.04 * 2 / 1 = 0.08 but rank 2 gives 0.045 * 2 / 2 = 0.045
        let adjusted = benjamini_hochberg(&[0.04, 0.045]);
        assert!((adjusted[0] - 0.045).abs() < 1e-12);
        assert!((adjusted[1] - 0.045).abs() < 1e-12);
    }

    #[test]
    fn test_clipped_to_one() {
        let adjusted = benjamini_hochberg(&[0.9, 0.95, 1.0]);
        assert!(adjusted.iter().all(|&p| p <= 1.0));
    }

    #[test]
    fn test_adjusted_not_below_raw() {
        let raw = [0.001, 0.2, 0.04, 0.8, 0.013, 0.5];
        let adjusted = benjamini_hochberg(&raw);
        for (r, a) in raw.iter().zip(adjusted.iter()) {
            assert!(a >= r);
        }
    }
}
