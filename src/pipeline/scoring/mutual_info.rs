//! Empirical mutual information between an encoded feature and the class

use std::collections::HashMap;

use crate::pipeline::encoder::EncodedColumn;

/// Mutual information in nats over all rows carrying a feature code.
///
/// `MI = Σ p(x, y) ln(p(x, y) / (p(x) p(y)))` with probabilities taken from the
/// observed counts. A feature that never varies scores 0.
pub fn mutual_information(feature: &EncodedColumn, class: &[u32]) -> f64 {
    let mut joint: HashMap<(u32, u32), f64> = HashMap::new();
    let mut feature_counts: HashMap<u32, f64> = HashMap::new();
    let mut class_counts: HashMap<u32, f64> = HashMap::new();
    let mut total = 0.0f64;

    for (code, &c) in feature.codes.iter().zip(class.iter()) {
        if let Some(x) = code {
            *joint.entry((*x, c)).or_insert(0.0) += 1.0;
            *feature_counts.entry(*x).or_insert(0.0) += 1.0;
            *class_counts.entry(c).or_insert(0.0) += 1.0;
            total += 1.0;
        }
    }

    if total == 0.0 {
        return 0.0;
    }

    // Sum in a fixed order so the result is bit-for-bit reproducible
    let mut cells: Vec<((u32, u32), f64)> = joint.into_iter().collect();
    cells.sort_by_key(|(key, _)| *key);

    let mi: f64 = cells
        .iter()
        .map(|&((x, y), n_xy)| {
            let n_x = feature_counts[&x];
            let n_y = class_counts[&y];
            (n_xy / total) * ((n_xy * total) / (n_x * n_y)).ln()
        })
        .sum();

    // Rounding can leave a tiny negative value for independent variables
    mi.max(0.0)
}
