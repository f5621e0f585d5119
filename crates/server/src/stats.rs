//! Catalog-wide statistics for display.

use data_loader::Catalog;
use pipeline::FeatureSpace;
use pipeline::features::VOTES;
use serde::Serialize;

/// Summary numbers about the loaded catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    /// Mean over movies that have a rating
    pub mean_rating: Option<f64>,
    /// Largest cleaned vote count
    pub max_votes: f64,
}

impl CatalogStats {
    pub fn compute(catalog: &Catalog, space: &FeatureSpace) -> Self {
        let ratings: Vec<f64> = catalog.records().iter().filter_map(|m| m.rating).collect();
        let mean_rating =
            (!ratings.is_empty()).then(|| ratings.iter().sum::<f64>() / ratings.len() as f64);

        let max_votes = space
            .rows
            .iter()
            .map(|row| row[VOTES])
            .fold(0.0, f64::max);

        Self {
            total: catalog.len(),
            mean_rating,
            max_votes,
        }
    }
}

/// Render a vote count compactly: `2.8M votes`, `712K votes`, `532 votes`
pub fn format_votes(votes: f64) -> String {
    if votes >= 1_000_000.0 {
        format!("{:.1}M votes", votes / 1_000_000.0)
    } else if votes >= 1_000.0 {
        format!("{:.0}K votes", votes / 1_000.0)
    } else {
        format!("{:.0} votes", votes)
    }
}
