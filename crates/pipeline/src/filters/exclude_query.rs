//! Filter that removes the selected movie from its own candidates.
//!
//! A movie is always perfectly similar to itself, so it is dropped before
//! ranking rather than skipped by score.

use crate::traits::{CandidateFilter, QueryContext};
use anyhow::Result;

/// Removes the query movie from the candidate list.
pub struct ExcludeQueryFilter;

impl CandidateFilter for ExcludeQueryFilter {
    fn name(&self) -> &str {
        "ExcludeQueryFilter"
    }

    fn apply(&self, candidates: Vec<usize>, context: &QueryContext) -> Result<Vec<usize>> {
        Ok(candidates
            .into_iter()
            .filter(|&idx| idx != context.query)
            .collect())
    }
}
