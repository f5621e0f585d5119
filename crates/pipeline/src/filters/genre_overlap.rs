//! Filter to keep only movies sharing a genre with the query movie.
//!
//! When nothing in the candidate set shares a genre, the filter relaxes and
//! passes every candidate through, so a query still gets recommendations as
//! long as any other movie exists.

use crate::tokens::normalize_genres;
use crate::traits::{CandidateFilter, QueryContext};
use anyhow::{Result, anyhow};
use data_loader::Catalog;
use std::collections::BTreeSet;
use tracing::info;

/// Keeps candidates whose normalized genre set intersects the query's.
///
/// ## Algorithm
/// 1. Look up the query movie's normalized genres
/// 2. Keep candidates with at least one genre in common
/// 3. If none remain, return the input unchanged and mark the query relaxed
///
/// Movies without genre data never pass the strict test.
pub struct GenreOverlapFilter {
    genre_sets: Vec<BTreeSet<String>>,
}

impl GenreOverlapFilter {
    /// Precompute normalized genre sets for every catalog row.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            genre_sets: catalog
                .records()
                .iter()
                .map(|m| normalize_genres(m.genres.as_deref()))
                .collect(),
        }
    }

    /// Normalized genres of one catalog row
    pub fn genres_of(&self, index: usize) -> Option<&BTreeSet<String>> {
        self.genre_sets.get(index)
    }

    fn shares_genre(&self, query: &BTreeSet<String>, index: usize) -> bool {
        self.genre_sets
            .get(index)
            .is_some_and(|genres| !genres.is_disjoint(query))
    }
}

impl CandidateFilter for GenreOverlapFilter {
    fn name(&self) -> &str {
        "GenreOverlapFilter"
    }

    fn apply(&self, candidates: Vec<usize>, context: &QueryContext) -> Result<Vec<usize>> {
        let query_genres = self.genres_of(context.query).ok_or_else(|| {
            anyhow!(
                "Query index {} outside catalog of {} movies",
                context.query,
                self.genre_sets.len()
            )
        })?;

        let filtered: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&idx| self.shares_genre(query_genres, idx))
            .collect();

        if filtered.is_empty() && !candidates.is_empty() {
            info!(
                "No candidate shares a genre with movie {}, relaxing to {} candidates",
                context.query,
                candidates.len()
            );
            context.mark_relaxed();
            return Ok(candidates);
        }

        Ok(filtered)
    }
}
