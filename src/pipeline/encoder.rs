//! Categorical encoding of marker columns and joint marker features
//!
//! Every call builds a fresh mapping from distinct values to dense integer codes.
//! Codes are only meaningful inside the column (or joint feature) they were built
//! for; nothing is cached between calls.

use std::collections::{BTreeSet, HashMap};

use super::scoring::NotScoreable;

/// Separator between member codes in a joint key. Codes are decimal digits only.
const JOINT_SEPARATOR: char = '_';

/// Minimum number of non-missing values for a column to be testable
pub const MIN_NON_MISSING: usize = 2;

/// How missing values are treated while encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Missing values receive no code and are dropped by the consuming test
    Exclude,
    /// Missing values form a category of their own
    AsCategory,
}

/// A column mapped to dense codes `0..levels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedColumn {
    /// One code per row; `None` for an excluded missing value
    pub codes: Vec<Option<u32>>,
    /// Number of distinct codes
    pub levels: usize,
}

impl EncodedColumn {
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Number of rows carrying a code
    pub fn coded_count(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }
}

/// Encode a single column of categorical values.
///
/// Codes follow the ascending order of the values' string form (missing first when
/// it is its own category), so repeated calls on the same data give the same codes.
/// Columns with fewer than [`MIN_NON_MISSING`] non-missing values are rejected.
pub fn encode_column<S: AsRef<str>>(
    values: &[Option<S>],
    policy: MissingPolicy,
) -> Result<EncodedColumn, NotScoreable> {
    let non_missing = values.iter().filter(|v| v.is_some()).count();
    if non_missing < MIN_NON_MISSING {
        return Err(NotScoreable::TooFewValues { found: non_missing });
    }

    Ok(encode_values(values, policy))
}

/// Encode without the minimum-count check. Shared by single columns and joint keys.
fn encode_values<S: AsRef<str>>(values: &[Option<S>], policy: MissingPolicy) -> EncodedColumn {
    // BTreeSet orders None before every Some, which puts the missing category first
    let distinct: BTreeSet<Option<&str>> = values
        .iter()
        .map(|v| v.as_ref().map(|s| s.as_ref()))
        .filter(|v| v.is_some() || policy == MissingPolicy::AsCategory)
        .collect();

    let lookup: HashMap<Option<&str>, u32> = distinct
        .iter()
        .enumerate()
        .map(|(code, value)| (*value, code as u32))
        .collect();

    let codes = values
        .iter()
        .map(|v| lookup.get(&v.as_ref().map(|s| s.as_ref())).copied())
        .collect();

    EncodedColumn {
        codes,
        levels: distinct.len(),
    }
}

/// Build the joint feature of several already-encoded columns.
///
/// Each row's member codes are joined into a composite key and re-encoded, so two
/// rows share a joint code exactly when they agree on every member. A row missing any
/// member code has no joint code.
pub fn encode_joint(columns: &[&EncodedColumn]) -> EncodedColumn {
    let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);

    let keys: Vec<Option<String>> = (0..n_rows)
        .map(|row| {
            let mut key = String::new();
            for (i, column) in columns.iter().enumerate() {
                let code = column.codes.get(row).copied().flatten()?;
                if i > 0 {
                    key.push(JOINT_SEPARATOR);
                }
                key.push_str(&code.to_string());
            }
            Some(key)
        })
        .collect();

    encode_values(&keys, MissingPolicy::Exclude)
}

/// Encode the members of a marker subset and return their joint feature.
///
/// Single-marker subsets return the member encoding directly.
pub fn encode_subset<S: AsRef<str>>(
    members: &[&[Option<S>]],
    policy: MissingPolicy,
) -> Result<EncodedColumn, NotScoreable> {
    let encoded = members
        .iter()
        .map(|values| encode_column(values, policy))
        .collect::<Result<Vec<_>, _>>()?;

    match encoded.as_slice() {
        [] => Err(NotScoreable::TooFewValues { found: 0 }),
        [single] => Ok(single.clone()),
        many => {
            let refs: Vec<&EncodedColumn> = many.iter().collect();
            Ok(encode_joint(&refs))
        }
    }
}
