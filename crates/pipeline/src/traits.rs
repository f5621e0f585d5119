//! Core traits for candidate filtering.
//!
//! A candidate is a catalog row index. Filters narrow the set of rows that
//! the ranker will score for a single query.

use anyhow::Result;
use std::cell::Cell;

/// Per-query state handed to every filter.
#[derive(Debug)]
pub struct QueryContext {
    /// Catalog index of the movie the user selected
    pub query: usize,
    relaxed: Cell<bool>,
}

impl QueryContext {
    pub fn new(query: usize) -> Self {
        Self {
            query,
            relaxed: Cell::new(false),
        }
    }

    /// Record that a filter widened its result instead of returning nothing
    pub fn mark_relaxed(&self) {
        self.relaxed.set(true);
    }

    /// Whether any filter fell back to its relaxed behaviour for this query
    pub fn was_relaxed(&self) -> bool {
        self.relaxed.get()
    }
}

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` lets a session holding its filters be shared across threads
/// - Filters take ownership of the candidate list and return the narrowed list,
///   preserving catalog order
pub trait CandidateFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidate row indices (takes ownership)
    /// * `context` - The query being answered
    fn apply(&self, candidates: Vec<usize>, context: &QueryContext) -> Result<Vec<usize>>;
}
