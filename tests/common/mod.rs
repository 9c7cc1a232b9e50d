//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use episcan::pipeline::{Dataset, DatasetError, DatasetProvider};
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Class labels: ten of class 0 followed by ten of class 1
pub fn balanced_class() -> Vec<i64> {
    let mut class = vec![0i64; 10];
    class.extend(vec![1i64; 10]);
    class
}

/// Perfect single marker among noise.
///
/// - `M1`: same 0/1 pattern in both classes (chi-squared = 0)
/// - `M2`: identical to the class label (chi-squared = 20 on 1 dof)
/// - `M3`: same three-level pattern in both classes (chi-squared = 0)
pub fn create_perfect_marker_dataframe() -> DataFrame {
    let half_m1 = [0i64, 1, 0, 1, 0, 1, 0, 1, 0, 1];
    let half_m3 = [0i64, 0, 1, 1, 2, 2, 0, 1, 2, 0];
    let m1: Vec<i64> = half_m1.iter().chain(half_m1.iter()).copied().collect();
    let m3: Vec<i64> = half_m3.iter().chain(half_m3.iter()).copied().collect();
    let class = balanced_class();

    df! {
        "M1" => m1,
        "M2" => class.clone(),
        "M3" => m3,
        "Class" => class,
    }
    .unwrap()
}

/// Class is the XOR of `M1` and `M3`; `M2` is constant and `M4` alternates by block.
///
/// Every (M1, M3) combination appears five times, so no marker alone carries
/// information while the pair (M1, M3) determines the class.
pub fn create_xor_dataframe() -> DataFrame {
    let mut m1 = Vec::new();
    let mut m3 = Vec::new();
    let mut m4 = Vec::new();
    let mut class = Vec::new();
    for block in 0..5i64 {
        for (a, b) in [(0i64, 0i64), (0, 1), (1, 0), (1, 1)] {
            m1.push(a);
            m3.push(b);
            m4.push(block % 2);
            class.push(a ^ b);
        }
    }

    df! {
        "M1" => m1,
        "M2" => vec![0i64; 20],
        "M3" => m3,
        "M4" => m4,
        "Class" => class,
    }
    .unwrap()
}

/// Every marker is constant
pub fn create_constant_markers_dataframe() -> DataFrame {
    df! {
        "M1" => vec![1i64; 20],
        "M2" => vec![2i64; 20],
        "M3" => vec!["AA"; 20],
        "Class" => balanced_class(),
    }
    .unwrap()
}

/// Random genotype markers coded 0/1/2 with a seeded generator
pub fn create_random_dataframe(rows: usize, markers: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(markers + 1);
    for i in 0..markers {
        let values: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..3)).collect();
        columns.push(Column::new(format!("SNP{}", i + 1).into(), values));
    }

    // Keep both classes present
    let class: Vec<i64> = (0..rows).map(|r| (r % 2) as i64).collect();
    columns.push(Column::new("Class".into(), class));

    DataFrame::new(columns).unwrap()
}

/// Numeric markers for the two-sample and regression modes.
///
/// - `shift`: class 1 values shifted up by 3
/// - `noise`: same values in both classes
/// - `flat`: constant
pub fn create_numeric_dataframe() -> DataFrame {
    let base = [1.0f64, 2.0, 1.5, 2.5, 3.0, 2.0, 1.0, 3.5, 2.5, 1.5];
    let shift: Vec<f64> = base.iter().copied().chain(base.iter().map(|v| v + 3.0)).collect();
    let noise: Vec<f64> = base.iter().chain(base.iter()).copied().collect();
    let overlap: Vec<f64> = base
        .iter()
        .chain([2.0f64, 3.0, 2.5, 3.5, 4.0, 3.0, 2.0, 4.5, 3.5, 2.5].iter())
        .copied()
        .collect();

    df! {
        "shift" => shift,
        "noise" => noise,
        "overlap" => overlap,
        "flat" => vec![1.0f64; 20],
        "Class" => balanced_class(),
    }
    .unwrap()
}

/// Build a dataset from a fixture DataFrame with a `Class` column
pub fn dataset_from(df: &DataFrame) -> Dataset {
    Dataset::from_dataframe(df, "Class").unwrap()
}

/// File name used for dataset `index` in temp directories
pub fn dataset_file_name(index: u32) -> String {
    format!("P_{:03}.csv", index)
}

/// Write a DataFrame as CSV into `dir`
pub fn write_csv(dir: &Path, name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Create a temporary directory holding `P_NNN.csv` for each given index
pub fn create_dataset_dir(datasets: Vec<(u32, DataFrame)>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (index, mut df) in datasets {
        write_csv(temp_dir.path(), &dataset_file_name(index), &mut df);
    }
    temp_dir
}

/// Datasets held in memory, keyed by index
#[derive(Default)]
pub struct MemoryProvider {
    pub datasets: BTreeMap<u32, Dataset>,
}

impl MemoryProvider {
    pub fn with(mut self, index: u32, df: &DataFrame) -> Self {
        self.datasets.insert(index, dataset_from(df));
        self
    }
}

impl DatasetProvider for MemoryProvider {
    fn name(&self, index: u32) -> String {
        format!("memory_{}", index)
    }

    fn load(&self, index: u32) -> Result<Dataset, DatasetError> {
        self.datasets
            .get(&index)
            .cloned()
            .ok_or_else(|| DatasetError::NotFound(PathBuf::from(self.name(index))))
    }
}
