//! episcan: combinatorial marker association scanning
//!
//! Scores single markers, pairs or triplets of genotype markers against a binary
//! class label across a batch of datasets, corrects the p-value family of each
//! dataset for multiple testing and reports the surviving subsets.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
