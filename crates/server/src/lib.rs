//! Server crate for the movie similarity recommender.
//!
//! This crate owns the catalog session (catalog + feature space + normalized
//! matrix) and the orchestrator that answers queries against it.

pub mod error;
pub mod session;
pub mod stats;
pub mod orchestrator;

pub use error::RecommendError;
pub use orchestrator::RecommendationOrchestrator;
pub use session::{CatalogSession, MovieSummary, QueryResult, Recommendation, RecommenderConfig};
pub use stats::{CatalogStats, format_votes};
