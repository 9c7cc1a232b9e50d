//! In-memory genotype dataset: marker columns plus a binary class label
//!
//! Marker values are kept in their string form; each scoring mode decides how to
//! read them (categories or numbers). Class labels are encoded once on load.

use std::path::PathBuf;

use polars::prelude::*;
use thiserror::Error;

use super::encoder::{encode_column, MissingPolicy};

/// Errors raised while providing a dataset. None of them stop a batch.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("malformed dataset: {0}")]
    Malformed(String),
}

/// One marker column
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl MarkerColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Binary class labels encoded as 0/1.
///
/// The lexicographically larger label is the event (code 1), so `0`/`1` and
/// `control`/`case` keep their natural meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLabels {
    pub codes: Vec<u32>,
    /// Original label for code 0 and code 1
    pub levels: [String; 2],
}

impl ClassLabels {
    /// Encode raw labels. Every row needs a label and exactly two distinct labels
    /// must be present.
    pub fn from_values(values: &[Option<String>]) -> Result<Self, DatasetError> {
        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            return Err(DatasetError::Malformed(format!(
                "class column has {} missing value(s)",
                missing
            )));
        }

        let encoded = encode_column(values, MissingPolicy::Exclude)
            .map_err(|e| DatasetError::Malformed(format!("class column: {}", e)))?;

        if encoded.levels != 2 {
            return Err(DatasetError::Malformed(format!(
                "class column must be binary, found {} distinct value(s)",
                encoded.levels
            )));
        }

        let mut distinct: Vec<&str> = values.iter().flatten().map(|s| s.as_str()).collect();
        distinct.sort_unstable();
        distinct.dedup();

        Ok(Self {
            codes: encoded.codes.into_iter().flatten().collect(),
            levels: [distinct[0].to_string(), distinct[1].to_string()],
        })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Number of rows in class 0 and class 1
    pub fn group_sizes(&self) -> (usize, usize) {
        let events = self.codes.iter().filter(|&&c| c == 1).count();
        (self.codes.len() - events, events)
    }
}

/// A dataset ready for scanning
#[derive(Debug, Clone)]
pub struct Dataset {
    pub markers: Vec<MarkerColumn>,
    pub class: ClassLabels,
}

impl Dataset {
    /// Build a dataset, checking that every marker has one value per row
    pub fn new(markers: Vec<MarkerColumn>, class: ClassLabels) -> Result<Self, DatasetError> {
        if let Some(bad) = markers.iter().find(|m| m.values.len() != class.len()) {
            return Err(DatasetError::Malformed(format!(
                "marker '{}' has {} values but the class column has {}",
                bad.name,
                bad.values.len(),
                class.len()
            )));
        }
        Ok(Self { markers, class })
    }

    /// Split a DataFrame into marker columns (in column order) and the class column
    pub fn from_dataframe(df: &DataFrame, class_column: &str) -> Result<Self, DatasetError> {
        let class_col = df.column(class_column).map_err(|_| {
            DatasetError::Malformed(format!("class column '{}' not found", class_column))
        })?;

        if df.height() == 0 {
            return Err(DatasetError::Malformed("dataset has no rows".to_string()));
        }

        let class_values = column_to_string_vec(class_col)?;
        let class = ClassLabels::from_values(&class_values)?;

        let markers = df
            .get_columns()
            .iter()
            .filter(|col| col.name().as_str() != class_column)
            .map(|col| Ok(MarkerColumn::new(col.name().as_str(), column_to_string_vec(col)?)))
            .collect::<Result<Vec<_>, DatasetError>>()?;

        if markers.is_empty() {
            return Err(DatasetError::Malformed("dataset has no marker columns".to_string()));
        }

        Self::new(markers, class)
    }

    pub fn n_rows(&self) -> usize {
        self.class.len()
    }

    pub fn marker_names(&self) -> Vec<&str> {
        self.markers.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Convert a column to its per-row string form, keeping nulls
fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>, DatasetError> {
    let malformed = |e: PolarsError| {
        DatasetError::Malformed(format!("column '{}': {}", col.name(), e))
    };

    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()
            .map_err(malformed)?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => col
            .cast(&DataType::Int64)
            .map_err(malformed)?
            .i64()
            .map_err(malformed)?
            .into_iter()
            .map(|v| v.map(|n| n.to_string()))
            .collect(),
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => col
            .cast(&DataType::UInt64)
            .map_err(malformed)?
            .u64()
            .map_err(malformed)?
            .into_iter()
            .map(|v| v.map(|n| n.to_string()))
            .collect(),
        DataType::Float32 | DataType::Float64 => col
            .cast(&DataType::Float64)
            .map_err(malformed)?
            .f64()
            .map_err(malformed)?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()).map(|n| format!("{}", n)))
            .collect(),
        DataType::Boolean => col
            .bool()
            .map_err(malformed)?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => col
            .cast(&DataType::String)
            .map_err(malformed)?
            .str()
            .map_err(malformed)?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
    };

    Ok(values)
}
