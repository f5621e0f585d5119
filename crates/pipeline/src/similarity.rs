//! Cosine similarity and top-K ranking.

use crate::error::{PipelineError, Result};
use crate::normalize::NormalizedMatrix;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Cosine of the angle between `a` and `b`.
///
/// Returns 0 when either vector has zero magnitude. With the non-negative
/// normalized features used here the result lies in `[0, 1]`.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0, 0.0, 0.0), |(dot, na, nb), (&x, &y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// A candidate row and its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub score: f64,
}

/// Ranks candidates by cosine similarity to a query row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityRanker;

impl SimilarityRanker {
    /// Score `candidates` against row `query` and keep the best `k`.
    ///
    /// Scores are computed in parallel. The sort is stable, so equal scores
    /// keep catalog order. `k` larger than the candidate count returns all
    /// candidates.
    pub fn rank(
        &self,
        matrix: &NormalizedMatrix,
        query: usize,
        candidates: &[usize],
        k: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        let query_row = matrix.row(query)?;

        let mut scored = candidates
            .par_iter()
            .map(|&index| -> Result<ScoredCandidate> {
                let score = cosine_similarity(query_row, matrix.row(index)?)?;
                Ok(ScoredCandidate { index, score })
            })
            .collect::<Result<Vec<_>>>()?;

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k.min(candidates.len()));
        Ok(scored)
    }
}
