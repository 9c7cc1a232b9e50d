//! Pipeline module - loads datasets and runs the association scan

pub mod batch;
pub mod combinations;
pub mod correction;
pub mod dataset;
pub mod encoder;
pub mod loader;
pub mod scan;
pub mod scoring;
pub mod selection;

pub use batch::*;
pub use combinations::*;
pub use correction::*;
pub use dataset::*;
pub use encoder::*;
pub use loader::*;
pub use scan::*;
pub use scoring::{
    score_subset, NotScoreable, ScoringMode, ScoringOptions, DEFAULT_MAX_ITERATIONS,
};
pub use selection::*;
