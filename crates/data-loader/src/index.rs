//! Lookups over a loaded catalog: title matching, search and genre browsing.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;

impl Catalog {
    /// Load a catalog from a CSV file.
    ///
    /// This is the main entry point for loading data.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        parser::parse_catalog(path)
    }

    /// Find the first movie whose title contains `query`, ignoring case.
    ///
    /// Catalog order decides between several hits, so a short query such as
    /// `"up"` resolves to whichever matching title comes first.
    pub fn find_by_title(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .position(|m| m.title.to_lowercase().contains(&query))
    }

    /// All movies matching `query`.
    ///
    /// Exact (case-insensitive) title matches come first, then substring
    /// matches; each group is ordered by rating, highest first.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        let mut matches: Vec<(usize, u8)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(idx, movie)| {
                let title = movie.title.to_lowercase();
                if title == query {
                    Some((idx, 0))
                } else if title.contains(&query) {
                    Some((idx, 1))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| compare_rating_desc(&self.records[a.0], &self.records[b.0]))
        });
        matches.into_iter().map(|(idx, _)| idx).collect()
    }

    /// Sorted, distinct genre names across the catalog
    pub fn genres(&self) -> Vec<String> {
        let genres: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|m| m.genre_list())
            .collect();
        genres.into_iter().map(str::to_string).collect()
    }

    /// Highest-rated movies whose genre field contains `genre`.
    ///
    /// Matching is a case-sensitive substring test on the raw genre field,
    /// so `"Action"` also matches a field such as `"Action-Thriller, Crime"`.
    pub fn top_in_genre(&self, genre: &str, limit: usize) -> Vec<usize> {
        let mut matches: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, m)| m.genres.as_deref().is_some_and(|g| g.contains(genre)))
            .map(|(idx, _)| idx)
            .collect();

        matches.sort_by(|&a, &b| compare_rating_desc(&self.records[a], &self.records[b]));
        matches.truncate(limit);
        matches
    }
}

/// Rating descending; unrated movies sort last
fn compare_rating_desc(a: &MovieRecord, b: &MovieRecord) -> Ordering {
    match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, rating: f64, genres: &str) -> MovieRecord {
        MovieRecord {
            rating: Some(rating),
            genres: Some(genres.to_string()),
            ..MovieRecord::new(title)
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::from_records(vec![
            movie("Up (2009)", 8.3, "Animation, Adventure"),
            movie("Groundhog Day (1993)", 8.0, "Comedy, Fantasy"),
            movie("Up", 6.0, "Documentary"),
            movie("Pulp Fiction (1994)", 8.9, "Crime, Drama"),
            movie("The Upside (2017)", 6.3, "Comedy, Drama"),
        ])
    }

    #[test]
    fn test_find_by_title_first_match_wins() {
        let catalog = test_catalog();
        assert_eq!(catalog.find_by_title("up"), Some(0));
        assert_eq!(catalog.find_by_title("PULP"), Some(3));
        assert_eq!(catalog.find_by_title("nonexistent-title-xyz"), None);
    }

    #[test]
    fn test_search_orders_exact_then_rating() {
        let catalog = test_catalog();
        // "Up" is exact; the rest are substring hits ordered by rating
        assert_eq!(catalog.search("up"), vec![2, 0, 4]);
    }

    #[test]
    fn test_genres_sorted_distinct() {
        let catalog = test_catalog();
        assert_eq!(
            catalog.genres(),
            vec![
                "Adventure",
                "Animation",
                "Comedy",
                "Crime",
                "Documentary",
                "Drama",
                "Fantasy"
            ]
        );
    }

    #[test]
    fn test_top_in_genre() {
        let catalog = test_catalog();
        assert_eq!(catalog.top_in_genre("Drama", 5), vec![3, 4]);
        assert_eq!(catalog.top_in_genre("Comedy", 1), vec![1]);
        assert!(catalog.top_in_genre("drama", 5).is_empty());
    }

    #[test]
    fn test_empty_catalog_queries() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.find_by_title("anything"), None);
        assert!(catalog.search("anything").is_empty());
        assert!(catalog.genres().is_empty());
    }
}
