//! End-to-end: CSV text in, explained recommendations out.

use data_loader::parse_catalog_reader;
use pipeline::Reason;
use server::{RecommendError, RecommendationOrchestrator};

const CATALOG: &str = "\
Title,Votes,IMDb Rating,Meta Score,Genre,Director,Stars,Tags
The Godfather (1972),2M,9.2,100,\"Crime, Drama\",Francis Ford Coppola,\"Marlon Brando, Al Pacino\",\"mafia, family\"
The Godfather Part II (1974),1.4M,9.0,90,\"Crime, Drama\",Francis Ford Coppola,\"Al Pacino, Robert De Niro\",\"mafia, sequel\"
Apocalypse Now (1979),700K,8.4,94,\"Drama, Mystery, War\",Francis Ford Coppola,\"Martin Sheen, Marlon Brando\",war
The Conversation (1974),120K,7.8,87,\"Mystery, Thriller\",Francis Ford Coppola,Gene Hackman,surveillance
Finding Nemo (2003),1.1M,8.2,90,\"Animation, Adventure, Comedy\",Andrew Stanton,\"Albert Brooks, Ellen DeGeneres\",ocean
";

fn orchestrator() -> RecommendationOrchestrator {
    let catalog = parse_catalog_reader(CATALOG.as_bytes(), "catalog.csv").unwrap();
    RecommendationOrchestrator::new(catalog).unwrap()
}

#[test]
fn test_godfather_recommendations() {
    let result = orchestrator().recommend("the godfather", 3).unwrap();

    assert_eq!(result.base.title, "The Godfather (1972)");
    assert_eq!(result.base.year, Some(1972));

    let titles: Vec<&str> = result
        .recommendations
        .iter()
        .map(|r| r.movie.title.as_str())
        .collect();
    assert_eq!(titles.len(), 2);
    assert_eq!(titles[0], "The Godfather Part II (1974)");
    assert!(titles.contains(&"Apocalypse Now (1979)"));

    let sequel = &result.recommendations[0];
    assert_eq!(
        sequel.explanation.reasons[..4],
        [
            Reason::SharedGenres(vec!["crime".to_string(), "drama".to_string()]),
            Reason::SharedTags(vec!["mafia".to_string()]),
            Reason::SameDirector,
            Reason::SharedCast(vec!["al pacino".to_string()]),
        ]
    );
    assert_eq!(sequel.explanation.reasons[5], Reason::YearsApart(2));
}

#[test]
fn test_votes_with_m_suffix_count_as_zero() {
    let session = orchestrator().session();
    let stats = session.stats();
    // "2M" and "1.4M" are not understood; the largest parsed count is 700K
    assert_eq!(stats.max_votes, 700_000.0);
}

#[test]
fn test_not_found_is_a_value() {
    let outcome = orchestrator().recommend("nonexistent-title-xyz", 5);
    assert!(matches!(outcome, Err(RecommendError::TitleNotFound { .. })));
}

#[test]
fn test_relaxed_query_ranks_everything_else() {
    let result = orchestrator().recommend("nemo", 10).unwrap();
    assert!(result.genre_relaxed);
    assert_eq!(result.recommendations.len(), 4);
}
