//! Feature construction and similarity ranking for movie recommendations.
//!
//! This crate provides:
//! - FeatureBuilder for turning catalog records into numeric rows
//! - MinMaxNormalizer / NormalizedMatrix for per-column rescaling
//! - CandidateFilter trait and implementations for narrowing candidates
//! - FilterPipeline for composing filters
//! - SimilarityRanker for cosine-similarity top-K ranking
//! - ExplanationGenerator for per-recommendation reasons
//!
//! ## Architecture
//! Work is split between catalog load time and query time:
//! 1. Once per catalog: build features, then normalize every column
//! 2. Per query: filter candidates (exclude the query, require a shared genre),
//!    rank survivors by cosine similarity, explain each result
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{build_feature_space, NormalizedMatrix, FilterPipeline, SimilarityRanker};
//! use pipeline::filters::*;
//!
//! let space = build_feature_space(&catalog);
//! let matrix = NormalizedMatrix::from_space(&space)?;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(ExcludeQueryFilter)
//!     .add_filter(GenreOverlapFilter::new(&catalog));
//!
//! let context = QueryContext::new(query);
//! let candidates = pipeline.apply((0..catalog.len()).collect(), &context)?;
//! let ranked = SimilarityRanker.rank(&matrix, query, &candidates, 5)?;
//! ```

pub mod error;
pub mod tokens;
pub mod features;
pub mod normalize;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod similarity;
pub mod explain;

// Re-export main types
pub use error::PipelineError;
pub use explain::{Explanation, ExplanationGenerator, Reason};
pub use features::{
    FeatureBuilder, FeatureSet, FeatureSpace, OptionalFeature, Vocabularies, Vocabulary,
    build_feature_space, clean_votes, extract_year_from_title, record_year, resolve_year,
};
pub use filter_pipeline::FilterPipeline;
pub use normalize::{MinMaxNormalizer, NormalizedMatrix};
pub use similarity::{ScoredCandidate, SimilarityRanker, cosine_similarity};
pub use traits::{CandidateFilter, QueryContext};
