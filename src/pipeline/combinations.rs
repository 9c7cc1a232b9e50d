//! Exhaustive enumeration of k-marker subsets
//!
//! Subsets are generated as index tuples in lexicographic order. The enumeration
//! can be restarted any number of times and never repeats a member set.

/// Default leading marker window for pair scans
pub const DEFAULT_PAIR_WINDOW: usize = 50;

/// Default leading marker window for triplet scans
pub const DEFAULT_TRIPLET_WINDOW: usize = 30;

/// Largest supported subset size
pub const MAX_SUBSET_SIZE: usize = 3;

/// All size-`k` subsets of `0..n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combinations {
    n: usize,
    k: usize,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self { n, k }
    }

    /// Number of subsets the iterator yields, C(n, k) for k >= 1
    pub fn count(&self) -> u64 {
        if self.k == 0 {
            return 0;
        }
        binomial(self.n, self.k)
    }

    /// Start a fresh lexicographic pass over every subset
    pub fn iter(&self) -> CombinationIter {
        let first = if self.k == 0 || self.k > self.n {
            None
        } else {
            Some((0..self.k).collect())
        };
        CombinationIter { n: self.n, next: first }
    }
}

impl IntoIterator for &Combinations {
    type Item = Vec<usize>;
    type IntoIter = CombinationIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lexicographic iterator over index tuples
#[derive(Debug, Clone)]
pub struct CombinationIter {
    n: usize,
    next: Option<Vec<usize>>,
}

impl Iterator for CombinationIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let k = current.len();

        // Rightmost position that can still be advanced
        let mut successor = current.clone();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if successor[i] < self.n - k + i {
                successor[i] += 1;
                for j in (i + 1)..k {
                    successor[j] = successor[j - 1] + 1;
                }
                self.next = Some(successor);
                break;
            }
        }

        Some(current)
    }
}

/// C(n, k) without overflow for the sizes used here
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

/// Leading marker window applied to a scan of size `k`.
///
/// An explicit `window` always wins. Without one, pair and triplet scans fall back to
/// [`DEFAULT_PAIR_WINDOW`] and [`DEFAULT_TRIPLET_WINDOW`]; single-marker scans use
/// every marker.
pub fn effective_window(k: usize, window: Option<usize>) -> Option<usize> {
    window.or(match k {
        2 => Some(DEFAULT_PAIR_WINDOW),
        3 => Some(DEFAULT_TRIPLET_WINDOW),
        _ => None,
    })
}

/// Truncate the marker list to the leading window
pub fn marker_window<T>(markers: &[T], window: Option<usize>) -> &[T] {
    match window {
        Some(w) if w < markers.len() => &markers[..w],
        _ => markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_in_lexicographic_order() {
        let subsets: Vec<Vec<usize>> = Combinations::new(4, 2).iter().collect();
        assert_eq!(
            subsets,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_singletons() {
        let subsets: Vec<Vec<usize>> = Combinations::new(3, 1).iter().collect();
        assert_eq!(subsets, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_count_matches_enumeration() {
        for n in 0..8 {
            for k in 0..=4 {
                let combos = Combinations::new(n, k);
                assert_eq!(combos.iter().count() as u64, combos.count(), "n={}, k={}", n, k);
            }
        }
    }

    #[test]
    fn test_restartable() {
        let combos = Combinations::new(5, 3);
        let first: Vec<Vec<usize>> = combos.iter().collect();
        let second: Vec<Vec<usize>> = (&combos).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }

    #[test]
    fn test_no_duplicate_member_sets() {
        let mut seen = std::collections::HashSet::new();
        for subset in Combinations::new(7, 3).iter() {
            assert!(subset.windows(2).all(|w| w[0] < w[1]));
            assert!(seen.insert(subset));
        }
    }

    #[test]
    fn test_k_larger_than_n_is_empty() {
        assert_eq!(Combinations::new(2, 3).iter().count(), 0);
        assert_eq!(Combinations::new(3, 0).iter().count(), 0);
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(50, 2), 1225);
        assert_eq!(binomial(30, 3), 4060);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(2, 5), 0);
    }

    #[test]
    fn test_effective_window() {
        assert_eq!(effective_window(1, None), None);
        assert_eq!(effective_window(2, None), Some(50));
        assert_eq!(effective_window(3, None), Some(30));
        assert_eq!(effective_window(2, Some(10)), Some(10));
    }

    #[test]
    fn test_marker_window_truncates() {
        let markers = ["a", "b", "c", "d"];
        assert_eq!(marker_window(&markers, Some(2)), &["a", "b"]);
        assert_eq!(marker_window(&markers, Some(10)), &markers[..]);
        assert_eq!(marker_window(&markers, None), &markers[..]);
    }
}
