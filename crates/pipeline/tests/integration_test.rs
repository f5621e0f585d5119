//! Integration tests for the pipeline.
//!
//! These tests run features, normalization, filtering and ranking together
//! over a small catalog.

use data_loader::{Catalog, MovieRecord};
use pipeline::filters::*;
use pipeline::tokens::normalize_genres;
use pipeline::{
    FilterPipeline, NormalizedMatrix, QueryContext, SimilarityRanker, build_feature_space,
    cosine_similarity, features::NUMERIC_COLUMNS,
};

fn movie(title: &str, rating: f64, votes: &str, genres: &str, director: &str) -> MovieRecord {
    MovieRecord {
        rating: Some(rating),
        votes: Some(votes.to_string()),
        genres: Some(genres.to_string()),
        director: Some(director.to_string()),
        ..MovieRecord::new(title)
    }
}

fn create_test_catalog() -> Catalog {
    Catalog::from_records(vec![
        movie("The Dark Knight (2008)", 9.0, "2.8M", "Action, Crime, Drama", "Christopher Nolan"),
        movie("Inception (2010)", 8.8, "2.5M", "Action, Adventure, Sci-Fi", "Christopher Nolan"),
        movie("Amélie (2001)", 8.3, "780K", "Comedy, Romance", "Jean-Pierre Jeunet"),
        movie("Heat (1995)", 8.3, "712K", "Action, Crime, Drama", "Michael Mann"),
        movie("Spirited Away (2001)", 8.6, "850K", "Animation, Family, Fantasy", "Hayao Miyazaki"),
        movie("Goodfellas (1990)", 8.7, "1.2K", "Biography, Crime, Drama", "Martin Scorsese"),
    ])
}

fn run_query(catalog: &Catalog, query: usize, k: usize) -> (Vec<usize>, bool) {
    let space = build_feature_space(catalog);
    let matrix = NormalizedMatrix::from_space(&space).unwrap();
    let pipeline = FilterPipeline::new()
        .add_filter(ExcludeQueryFilter)
        .add_filter(GenreOverlapFilter::new(catalog));

    let context = QueryContext::new(query);
    let candidates = pipeline
        .apply((0..catalog.len()).collect(), &context)
        .unwrap();
    let ranked = SimilarityRanker
        .rank(&matrix, query, &candidates, k)
        .unwrap();
    (ranked.iter().map(|c| c.index).collect(), context.was_relaxed())
}

#[test]
fn test_dimension_matches_vocabularies() {
    let catalog = create_test_catalog();
    let space = build_feature_space(&catalog);

    let expected = NUMERIC_COLUMNS
        + space.vocabularies.directors.len()
        + space.vocabularies.cast.len()
        + space.vocabularies.genres.len();
    assert_eq!(space.dimension(), expected);
    assert!(space.rows.iter().all(|r| r.len() == expected));
}

#[test]
fn test_self_similarity_is_one() {
    let catalog = create_test_catalog();
    let matrix = NormalizedMatrix::from_space(&build_feature_space(&catalog)).unwrap();

    for idx in 0..matrix.len() {
        let row = matrix.row(idx).unwrap();
        if row.iter().any(|v| *v != 0.0) {
            let sim = cosine_similarity(row, row).unwrap();
            assert!((sim - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_query_is_never_recommended() {
    let catalog = create_test_catalog();
    for query in 0..catalog.len() {
        let (ranked, _) = run_query(&catalog, query, 10);
        assert!(!ranked.contains(&query));
    }
}

#[test]
fn test_recommendations_share_a_genre() {
    let catalog = create_test_catalog();
    let (ranked, relaxed) = run_query(&catalog, 0, 10);

    assert!(!relaxed);
    let query_genres = normalize_genres(catalog.get(0).unwrap().genres.as_deref());
    for idx in &ranked {
        let genres = normalize_genres(catalog.get(*idx).unwrap().genres.as_deref());
        assert!(!genres.is_disjoint(&query_genres));
    }
    // Inception, Heat and Goodfellas share a genre; Amélie and Spirited Away don't
    assert_eq!(ranked.len(), 3);
}

#[test]
fn test_relaxation_uses_full_catalog() {
    let catalog = create_test_catalog();
    let (ranked, relaxed) = run_query(&catalog, 4, 10);

    assert!(relaxed);
    assert_eq!(ranked.len(), catalog.len() - 1);
}

#[test]
fn test_k_is_clamped() {
    let catalog = create_test_catalog();
    let (ranked, _) = run_query(&catalog, 2, 100);
    assert!(ranked.len() <= catalog.len() - 1);
}
