//! Report module - writing and summarizing batch results

pub mod batch_export;
pub mod summary;

pub use batch_export::*;
pub use summary::*;
