//! Human-readable reasons for a recommendation.
//!
//! Clauses always appear in the same order: shared genres, shared tags,
//! same director, shared cast (or a note that none of those apply), then the
//! rating difference, then the release-year comparison when both years are
//! known.

use crate::features::{FeatureSet, OptionalFeature, record_year};
use crate::tokens::{normalize_genres, normalize_list, normalize_name};
use data_loader::MovieRecord;
use std::collections::BTreeSet;
use std::fmt;

/// One clause of an explanation
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    /// Genres both movies carry, normalized
    SharedGenres(Vec<String>),
    SharedTags(Vec<String>),
    SameDirector,
    SharedCast(Vec<String>),
    /// None of the categorical attributes overlap
    NothingShared,
    /// Absolute difference in rating
    RatingDifference(f64),
    SameYear,
    /// Absolute difference in release year
    YearsApart(u32),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::SharedGenres(g) => write!(f, "shared genres: {}", g.join(", ")),
            Reason::SharedTags(t) => write!(f, "shared tags: {}", t.join(", ")),
            Reason::SameDirector => f.write_str("same director"),
            Reason::SharedCast(c) => write!(f, "shared cast: {}", c.join(", ")),
            Reason::NothingShared => {
                f.write_str("no notable attribute in common, but overall similarity is high")
            }
            Reason::RatingDifference(d) => write!(f, "rating difference: {d:.1}"),
            Reason::SameYear => f.write_str("same release year"),
            Reason::YearsApart(1) => f.write_str("released 1 year apart"),
            Reason::YearsApart(n) => write!(f, "released {n} years apart"),
        }
    }
}

/// Ordered list of reasons, rendered as `"; "`-separated clauses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Explanation {
    pub reasons: Vec<Reason>,
}

impl Explanation {
    pub fn has(&self, pred: impl Fn(&Reason) -> bool) -> bool {
        self.reasons.iter().any(pred)
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reason) in self.reasons.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

/// Builds explanations, skipping clauses for features the catalog lacks.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationGenerator {
    features: FeatureSet,
}

impl ExplanationGenerator {
    pub fn new(features: FeatureSet) -> Self {
        Self { features }
    }

    /// Explain why `candidate` was recommended for `base`
    pub fn explain(&self, base: &MovieRecord, candidate: &MovieRecord) -> Explanation {
        let mut reasons = Vec::new();

        if self.features.contains(OptionalFeature::Genre) {
            let shared = intersect(
                normalize_genres(base.genres.as_deref()),
                &normalize_genres(candidate.genres.as_deref()),
            );
            if !shared.is_empty() {
                reasons.push(Reason::SharedGenres(shared));
            }
        }

        if self.features.contains(OptionalFeature::Tags) {
            let shared = intersect(
                normalize_list(base.tags.as_deref()),
                &normalize_list(candidate.tags.as_deref()),
            );
            if !shared.is_empty() {
                reasons.push(Reason::SharedTags(shared));
            }
        }

        if self.features.contains(OptionalFeature::Director) {
            let a = base.director.as_deref().and_then(normalize_name);
            let b = candidate.director.as_deref().and_then(normalize_name);
            if a.is_some() && a == b {
                reasons.push(Reason::SameDirector);
            }
        }

        if self.features.contains(OptionalFeature::Cast) {
            let shared = intersect(
                normalize_list(base.cast.as_deref()),
                &normalize_list(candidate.cast.as_deref()),
            );
            if !shared.is_empty() {
                reasons.push(Reason::SharedCast(shared));
            }
        }

        if reasons.is_empty() {
            reasons.push(Reason::NothingShared);
        }

        let rating_gap = (base.rating.unwrap_or(0.0) - candidate.rating.unwrap_or(0.0)).abs();
        reasons.push(Reason::RatingDifference(rating_gap));

        let (base_year, other_year) = (record_year(base), record_year(candidate));
        if base_year != 0 && other_year != 0 {
            reasons.push(match base_year.abs_diff(other_year) {
                0 => Reason::SameYear,
                n => Reason::YearsApart(n),
            });
        }

        Explanation { reasons }
    }
}

fn intersect(a: BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    a.into_iter().filter(|x| b.contains(x)).collect()
}
