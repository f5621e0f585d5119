//! # Catalog Session
//!
//! A session owns one catalog snapshot together with everything derived from
//! it: vocabularies, raw feature rows, the normalized matrix and the
//! per-query filter chain. It is built once and never mutated; reloading the
//! catalog means building a new session.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, info, instrument, warn};

use data_loader::{Catalog, MovieRecord};
use pipeline::filters::{ExcludeQueryFilter, GenreOverlapFilter};
use pipeline::{
    Explanation, ExplanationGenerator, FeatureBuilder, FeatureSet, FeatureSpace, FilterPipeline,
    NormalizedMatrix, OptionalFeature, QueryContext, SimilarityRanker, record_year,
};

use crate::error::RecommendError;
use crate::stats::CatalogStats;

/// Tuning knobs for building a session
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// Recommendation count used when the caller does not pick one
    pub default_k: usize,
    /// Optional contributions to enable; `None` follows the catalog's columns
    pub features: Option<FeatureSet>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_k: 5,
            features: None,
        }
    }
}

impl RecommenderConfig {
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = Some(features);
        self
    }
}

/// Display-ready facts about one movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    /// Position in the catalog
    pub index: usize,
    pub title: String,
    /// Resolved release year, `None` when unknown
    pub year: Option<i32>,
    pub rating: Option<f64>,
    /// Genre field as written in the catalog
    pub genres: Option<String>,
    /// Poster link, only when it is an HTTP(S) URL
    pub poster_url: Option<String>,
}

impl MovieSummary {
    fn from_record(index: usize, movie: &MovieRecord) -> Self {
        let year = record_year(movie);
        Self {
            index,
            title: movie.title.clone(),
            year: (year != 0).then_some(year),
            rating: movie.rating,
            genres: movie.genres.clone(),
            poster_url: movie.poster_url().map(str::to_string),
        }
    }
}

/// One recommended movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie: MovieSummary,
    /// Cosine similarity to the base movie
    pub score: f64,
    #[serde(serialize_with = "as_display")]
    pub explanation: Explanation,
}

/// Answer to a single query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// The movie the query resolved to
    pub base: MovieSummary,
    /// Best matches first
    pub recommendations: Vec<Recommendation>,
    /// True when no movie shared a genre and the whole catalog was ranked
    pub genre_relaxed: bool,
}

fn as_display<S: Serializer, T: fmt::Display>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Immutable catalog snapshot with its derived feature space.
pub struct CatalogSession {
    catalog: Catalog,
    space: FeatureSpace,
    matrix: NormalizedMatrix,
    filters: FilterPipeline,
    ranker: SimilarityRanker,
    explainer: ExplanationGenerator,
    config: RecommenderConfig,
}

impl fmt::Debug for CatalogSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSession")
            .field("movies", &self.catalog.len())
            .field("dimension", &self.matrix.dimension())
            .field("filters", &self.filters.filter_names())
            .finish()
    }
}

impl CatalogSession {
    /// Build a session with default configuration
    pub fn new(catalog: Catalog) -> Result<Self, RecommendError> {
        Self::with_config(catalog, RecommenderConfig::default())
    }

    /// Build features, normalize them and assemble the filter chain.
    ///
    /// The genre filter is only installed when genre data is part of the
    /// active feature set.
    pub fn with_config(
        catalog: Catalog,
        config: RecommenderConfig,
    ) -> Result<Self, RecommendError> {
        let builder = match config.features {
            Some(features) => FeatureBuilder::new().with_features(features),
            None => FeatureBuilder::new(),
        };
        let space = builder.build(&catalog);
        let matrix = NormalizedMatrix::from_space(&space)?;

        let mut filters = FilterPipeline::new().add_filter(ExcludeQueryFilter);
        if space.features.contains(OptionalFeature::Genre) {
            filters = filters.add_filter(GenreOverlapFilter::new(&catalog));
        }
        let explainer = ExplanationGenerator::new(space.features);

        info!(
            "Catalog session ready: {} movies, {} features",
            catalog.len(),
            matrix.dimension()
        );
        if catalog.is_empty() {
            warn!("Catalog is empty; recommendations will be unavailable");
        }

        Ok(Self {
            catalog,
            space,
            matrix,
            filters,
            ranker: SimilarityRanker,
            explainer,
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn feature_space(&self) -> &FeatureSpace {
        &self.space
    }

    pub fn matrix(&self) -> &NormalizedMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Summary of catalog row `index`
    pub fn summary(&self, index: usize) -> Option<MovieSummary> {
        self.catalog
            .get(index)
            .map(|movie| MovieSummary::from_record(index, movie))
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::compute(&self.catalog, &self.space)
    }

    /// Recommend up to `k` movies similar to the first title containing `title`.
    #[instrument(skip(self), fields(movies = self.catalog.len()))]
    pub fn recommend(&self, title: &str, k: usize) -> Result<QueryResult, RecommendError> {
        if self.catalog.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }

        let query = self
            .catalog
            .find_by_title(title)
            .ok_or_else(|| RecommendError::TitleNotFound {
                title: title.to_string(),
            })?;
        debug!("Resolved {:?} to catalog row {}", title, query);

        self.recommend_index(query, k)
    }

    /// Recommend up to `k` movies similar to catalog row `query`.
    pub fn recommend_index(&self, query: usize, k: usize) -> Result<QueryResult, RecommendError> {
        if self.catalog.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }
        let base_movie = self.catalog.get(query).ok_or_else(|| {
            RecommendError::Computation(format!(
                "Movie index {} out of range for catalog of {} movies",
                query,
                self.catalog.len()
            ))
        })?;

        let context = QueryContext::new(query);
        let candidates = self
            .filters
            .apply((0..self.catalog.len()).collect(), &context)
            .map_err(|e| RecommendError::Computation(format!("{e:#}")))?;

        let ranked = self.ranker.rank(&self.matrix, query, &candidates, k)?;

        let recommendations = ranked
            .into_iter()
            .filter_map(|scored| {
                let movie = self.catalog.get(scored.index)?;
                Some(Recommendation {
                    movie: MovieSummary::from_record(scored.index, movie),
                    score: scored.score,
                    explanation: self.explainer.explain(base_movie, movie),
                })
            })
            .collect();

        Ok(QueryResult {
            base: MovieSummary::from_record(query, base_movie),
            recommendations,
            genre_relaxed: context.was_relaxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::Reason;

    fn movie(title: &str, rating: f64, genres: &str, director: &str, cast: &str) -> MovieRecord {
        MovieRecord {
            rating: Some(rating),
            genres: Some(genres.to_string()),
            director: Some(director.to_string()),
            cast: Some(cast.to_string()),
            ..MovieRecord::new(title)
        }
    }

    fn build_test_session() -> CatalogSession {
        let catalog = Catalog::from_records(vec![
            movie("The Matrix (1999)", 8.7, "Action, Sci-Fi", "Lana Wachowski", "Keanu Reeves"),
            movie(
                "John Wick (2014)",
                7.4,
                "Action, Crime, Thriller",
                "Chad Stahelski",
                "Keanu Reeves",
            ),
            movie("Toy Story (1995)", 8.3, "Animation, Comedy", "John Lasseter", "Tom Hanks"),
            movie("Forrest Gump (1994)", 8.8, "Drama, Romance", "Robert Zemeckis", "Tom Hanks"),
            movie("Cast Away (2000)", 7.8, "Adventure, Drama", "Robert Zemeckis", "Tom Hanks"),
        ]);
        CatalogSession::new(catalog).unwrap()
    }

    #[test]
    fn test_recommend_resolves_title_case_insensitively() {
        let session = build_test_session();
        let result = session.recommend("forrest", 3).unwrap();

        assert_eq!(result.base.title, "Forrest Gump (1994)");
        assert_eq!(result.base.year, Some(1994));
        assert!(!result.genre_relaxed);
        // Only Cast Away shares a genre (Drama)
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].movie.title, "Cast Away (2000)");
    }

    #[test]
    fn test_explanations_follow_shared_attributes() {
        let session = build_test_session();
        let result = session.recommend("Cast Away", 5).unwrap();
        let top = &result.recommendations[0];

        assert_eq!(top.movie.index, 3);
        assert!(top.explanation.has(|r| *r == Reason::SameDirector));
        assert!(top.explanation.has(|r| matches!(r, Reason::SharedCast(_))));
        assert!(top.explanation.to_string().starts_with("shared genres: drama"));
    }

    #[test]
    fn test_not_found() {
        let session = build_test_session();
        let err = session.recommend("nonexistent-title-xyz", 5).unwrap_err();
        assert_eq!(
            err,
            RecommendError::TitleNotFound {
                title: "nonexistent-title-xyz".to_string()
            }
        );
    }

    #[test]
    fn test_k_larger_than_catalog() {
        let session = build_test_session();
        let result = session.recommend("Toy Story", 50).unwrap();

        // Toy Story shares no genre, so the whole catalog minus itself is ranked
        assert!(result.genre_relaxed);
        assert_eq!(result.recommendations.len(), 4);
        assert!(result.recommendations.iter().all(|r| r.movie.index != 2));
    }

    #[test]
    fn test_scores_are_descending() {
        let session = build_test_session();
        let result = session.recommend("Toy Story", 4).unwrap();
        let scores: Vec<f64> = result.recommendations.iter().map(|r| r.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_computation_error_leaves_session_usable() {
        let session = build_test_session();

        let err = session.recommend_index(9, 5).unwrap_err();
        assert!(matches!(err, RecommendError::Computation(_)));
        assert!(err.to_string().contains("out of range"));

        let result = session.recommend("matrix", 5).unwrap();
        assert_eq!(result.base.index, 0);
        assert_eq!(result.recommendations[0].movie.title, "John Wick (2014)");
    }

    #[test]
    fn test_extreme_vote_counts_keep_scores_finite() {
        let catalog = Catalog::from_records(vec![
            MovieRecord {
                votes: Some("-1e308".to_string()),
                ..MovieRecord::new("Low (1990)")
            },
            MovieRecord {
                votes: Some("1e308".to_string()),
                ..MovieRecord::new("High (1990)")
            },
        ]);
        let session = CatalogSession::new(catalog).unwrap();

        for row in session.matrix().rows() {
            assert!(row.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        let result = session.recommend("high", 5).unwrap();
        assert!(result.recommendations.iter().all(|r| r.score.is_finite()));
    }

    #[test]
    fn test_empty_catalog() {
        let session = CatalogSession::new(Catalog::new()).unwrap();
        assert_eq!(
            session.recommend("anything", 5).unwrap_err(),
            RecommendError::EmptyCatalog
        );
    }

    #[test]
    fn test_single_movie_catalog_has_no_recommendations() {
        let catalog = Catalog::from_records(vec![MovieRecord::new("Solaris (1972)")]);
        let session = CatalogSession::new(catalog).unwrap();

        let result = session.recommend("solaris", 5).unwrap();
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_genre_filter_skipped_without_genre_feature() {
        let catalog = build_test_session().catalog().clone();
        let config = RecommenderConfig::default()
            .with_features(FeatureSet::all().without(OptionalFeature::Genre));
        let session = CatalogSession::with_config(catalog, config).unwrap();

        let result = session.recommend("forrest", 10).unwrap();
        assert!(!result.genre_relaxed);
        assert_eq!(result.recommendations.len(), 4);
        assert!(
            result
                .recommendations
                .iter()
                .all(|r| !r.explanation.has(|x| matches!(x, Reason::SharedGenres(_))))
        );
    }

    #[test]
    fn test_query_result_serializes_explanation_as_text() {
        let session = build_test_session();
        let result = session.recommend("Cast Away", 1).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["base"]["title"], "Cast Away (2000)");
        assert!(json["recommendations"][0]["explanation"].is_string());
    }
}
