//! # Data Loader Crate
//!
//! Loads a movie catalog from CSV and offers the lookups the recommender
//! needs before any feature work starts.
//!
//! ## Main Components
//!
//! - **types**: `MovieRecord`, `Catalog`, and the `Column` set a file declared
//! - **parser**: CSV parsing with per-cell recovery for malformed values
//! - **index**: title lookup, search and genre browsing over a `Catalog`
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("imdb-top-rated-movies-user-rated.csv"))?;
//! if let Some(idx) = catalog.find_by_title("matrix") {
//!     println!("Found {}", catalog.get(idx).unwrap().title);
//! }
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use parser::{parse_catalog, parse_catalog_reader};
pub use types::{Catalog, Column, ColumnSet, MovieRecord, split_list};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();
        assert_eq!(catalog.len(), 0);
        assert!(catalog.has(Column::Title));
        assert!(!catalog.has(Column::Genre));
    }

    #[test]
    fn test_from_records_infers_columns() {
        let catalog = Catalog::from_records(vec![
            MovieRecord {
                director: Some("Michael Mann".to_string()),
                ..MovieRecord::new("Heat (1995)")
            },
            MovieRecord {
                genres: Some("Crime".to_string()),
                ..MovieRecord::new("Thief (1981)")
            },
        ]);

        assert!(catalog.has(Column::Director));
        assert!(catalog.has(Column::Genre));
        assert!(!catalog.has(Column::Stars));
        assert!(!catalog.has(Column::Tags));
    }

    #[test]
    fn test_column_headers_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
        assert_eq!(Column::from_header("Runtime"), None);
    }

    #[test]
    fn test_poster_url_requires_http() {
        let mut movie = MovieRecord::new("Alien (1979)");
        movie.poster_url = Some("https://img.example/alien.jpg".to_string());
        assert_eq!(movie.poster_url(), Some("https://img.example/alien.jpg"));

        movie.poster_url = Some("N/A".to_string());
        assert_eq!(movie.poster_url(), None);
    }

    #[test]
    fn test_record_list_fields() {
        let movie = MovieRecord {
            genres: Some("Drama, Crime".to_string()),
            tags: Some(" heist , los angeles,".to_string()),
            cast: Some("Al Pacino".to_string()),
            ..MovieRecord::new("Heat (1995)")
        };
        assert_eq!(movie.genre_list(), vec!["Drama", "Crime"]);
        assert_eq!(movie.tag_list(), vec!["heist", "los angeles"]);
        assert_eq!(movie.cast_list(), vec!["Al Pacino"]);
        assert!(MovieRecord::new("Alien").tag_list().is_empty());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some(" Drama, Crime ,,")), vec!["Drama", "Crime"]);
        assert!(split_list(None).is_empty());
    }
}
