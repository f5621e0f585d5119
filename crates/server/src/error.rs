//! Errors surfaced by a recommendation query.

use pipeline::PipelineError;
use thiserror::Error;

/// Why a query produced no result.
///
/// Every variant is local to the query that raised it; the session and its
/// feature matrix stay usable afterwards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// Nothing was loaded, so there is nothing to compare against
    #[error("The catalog is empty; recommendations are unavailable")]
    EmptyCatalog,

    /// No title contains the query string
    #[error("Movie not found in catalog: {title}")]
    TitleNotFound { title: String },

    /// Any other failure while computing the result
    #[error("Recommendation failed: {0}")]
    Computation(String),
}

impl From<PipelineError> for RecommendError {
    fn from(err: PipelineError) -> Self {
        RecommendError::Computation(err.to_string())
    }
}
