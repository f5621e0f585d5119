//! Error types for feature construction and ranking.

use thiserror::Error;

/// Failures inside the pipeline.
///
/// None of these leave shared state behind: a failed query can simply be
/// retried or reported, and the feature matrix it read from stays valid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Two vectors that must share a feature space do not
    #[error("Dimension mismatch: expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A row index outside the catalog
    #[error("Movie index {index} out of range for catalog of {len} movies")]
    UnknownMovie { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
