//! Filter implementations for the candidate pipeline.

pub mod exclude_query;
pub mod genre_overlap;

// Re-export for convenience
pub use exclude_query::ExcludeQueryFilter;
pub use genre_overlap::GenreOverlapFilter;
