//! Feature construction.
//!
//! Turns each catalog record into a fixed-width numeric row:
//!
//! | columns              | value                                    |
//! |----------------------|------------------------------------------|
//! | `rating`             | rating as-is, 0 if absent                |
//! | `critic_score`       | critic score as-is, 0 if absent          |
//! | `votes`              | cleaned vote count                       |
//! | `year`               | resolved release year, 0 if unknown      |
//! | `director:<name>` .. | one indicator per distinct director      |
//! | `cast:<name>` ..     | one indicator per distinct cast member   |
//! | `genre:<name>` ..    | one indicator per distinct genre         |
//!
//! The vocabularies are derived from the whole catalog, so the width of a row
//! is fixed for a given catalog snapshot and only changes on reload.

use crate::tokens::{normalize_list, normalize_name};
use data_loader::{Catalog, Column, MovieRecord};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Number of leading numeric columns in every row
pub const NUMERIC_COLUMNS: usize = 4;

pub const RATING: usize = 0;
pub const CRITIC_SCORE: usize = 1;
pub const VOTES: usize = 2;
pub const YEAR: usize = 3;

// =============================================================================
// Optional feature contributions
// =============================================================================

/// Contributions that depend on an optional catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalFeature {
    Director,
    Cast,
    Genre,
    Tags,
}

impl OptionalFeature {
    pub const ALL: [OptionalFeature; 4] = [
        OptionalFeature::Director,
        OptionalFeature::Cast,
        OptionalFeature::Genre,
        OptionalFeature::Tags,
    ];

    /// The catalog column this contribution is read from
    pub fn column(self) -> Column {
        match self {
            OptionalFeature::Director => Column::Director,
            OptionalFeature::Cast => Column::Stars,
            OptionalFeature::Genre => Column::Genre,
            OptionalFeature::Tags => Column::Tags,
        }
    }
}

/// Which optional contributions are active for a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet {
    director: bool,
    cast: bool,
    genre: bool,
    tags: bool,
}

impl FeatureSet {
    /// No optional contributions, numeric columns only
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        OptionalFeature::ALL.into_iter().fold(Self::none(), Self::with)
    }

    /// Enable exactly the contributions whose column the catalog carries
    pub fn for_catalog(catalog: &Catalog) -> Self {
        OptionalFeature::ALL
            .into_iter()
            .filter(|f| catalog.has(f.column()))
            .fold(Self::none(), Self::with)
    }

    pub fn with(mut self, feature: OptionalFeature) -> Self {
        *self.slot(feature) = true;
        self
    }

    pub fn without(mut self, feature: OptionalFeature) -> Self {
        *self.slot(feature) = false;
        self
    }

    pub fn contains(&self, feature: OptionalFeature) -> bool {
        match feature {
            OptionalFeature::Director => self.director,
            OptionalFeature::Cast => self.cast,
            OptionalFeature::Genre => self.genre,
            OptionalFeature::Tags => self.tags,
        }
    }

    fn slot(&mut self, feature: OptionalFeature) -> &mut bool {
        match feature {
            OptionalFeature::Director => &mut self.director,
            OptionalFeature::Cast => &mut self.cast,
            OptionalFeature::Genre => &mut self.genre,
            OptionalFeature::Tags => &mut self.tags,
        }
    }
}

// =============================================================================
// Vocabularies
// =============================================================================

/// Sorted set of distinct values, each owning one indicator column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Self {
        let terms: Vec<String> = terms
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let positions = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, positions }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Column offset of `term` within this vocabulary
    pub fn position(&self, term: &str) -> Option<usize> {
        self.positions.get(term).copied()
    }
}

/// The three catalog-wide vocabularies that define the indicator columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabularies {
    /// Lower-cased, trimmed director names
    pub directors: Vocabulary,
    /// Lower-cased, trimmed cast members
    pub cast: Vocabulary,
    /// Trimmed genre names, case preserved
    pub genres: Vocabulary,
}

impl Vocabularies {
    pub fn build(catalog: &Catalog, features: FeatureSet) -> Self {
        let records = catalog.records();

        let directors = if features.contains(OptionalFeature::Director) {
            Vocabulary::from_terms(
                records
                    .iter()
                    .filter_map(|m| m.director.as_deref().and_then(normalize_name)),
            )
        } else {
            Vocabulary::default()
        };

        let cast = if features.contains(OptionalFeature::Cast) {
            Vocabulary::from_terms(records.iter().flat_map(|m| normalize_list(m.cast.as_deref())))
        } else {
            Vocabulary::default()
        };

        let genres = if features.contains(OptionalFeature::Genre) {
            Vocabulary::from_terms(
                records
                    .iter()
                    .flat_map(|m| m.genre_list())
                    .map(str::to_string),
            )
        } else {
            Vocabulary::default()
        };

        Self {
            directors,
            cast,
            genres,
        }
    }

    /// Total indicator columns
    pub fn len(&self) -> usize {
        self.directors.len() + self.cast.len() + self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn director_offset(&self) -> usize {
        NUMERIC_COLUMNS
    }

    fn cast_offset(&self) -> usize {
        NUMERIC_COLUMNS + self.directors.len()
    }

    fn genre_offset(&self) -> usize {
        NUMERIC_COLUMNS + self.directors.len() + self.cast.len()
    }
}

// =============================================================================
// Field cleaning
// =============================================================================

/// Parse a vote count such as `"1.2K"` or `"532"`.
///
/// Only an uppercase `K` is understood as thousands. Anything that still
/// fails to parse (including `"3.1M"` or `"12k"`) counts as 0.
pub fn clean_votes(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    let parsed = if raw.contains('K') {
        raw.replace('K', "").trim().parse::<f64>().map(|n| n * 1000.0)
    } else {
        raw.trim().parse::<f64>()
    };

    match parsed {
        Ok(n) if n.is_finite() => n,
        _ => {
            debug!("Unparseable vote count {:?}, using 0", raw);
            0.0
        }
    }
}

/// Resolve the release year of a movie.
///
/// An explicit year field wins (a malformed one yields 0); without it the
/// year is taken from a `(YYYY)` group in the title. Unknown years are 0.
pub fn resolve_year(explicit: Option<&str>, title: &str) -> i32 {
    match explicit {
        Some(raw) => parse_year(raw).unwrap_or_else(|| {
            debug!("Unparseable year {:?} for {:?}, using 0", raw, title);
            0
        }),
        None => extract_year_from_title(title).unwrap_or(0),
    }
}

/// Year of a record, see [`resolve_year`]
pub fn record_year(movie: &MovieRecord) -> i32 {
    resolve_year(movie.year.as_deref(), &movie.title)
}

fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|y| y.is_finite() && y.fract() == 0.0)
            .map(|y| y as i32)
    })
}

/// Extract the first parenthesized four-digit year from a title
///
/// Example: "The Matrix (1999)" -> Some(1999)
///          "Alien" -> None
pub fn extract_year_from_title(title: &str) -> Option<i32> {
    title
        .as_bytes()
        .windows(6)
        .find(|w| w[0] == b'(' && w[5] == b')' && w[1..5].iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(&w[1..5]).ok())
        .and_then(|digits| digits.parse().ok())
}

// =============================================================================
// Feature space
// =============================================================================

/// Raw (unnormalized) feature rows for a catalog, plus their vocabularies.
#[derive(Debug, Clone)]
pub struct FeatureSpace {
    pub features: FeatureSet,
    pub vocabularies: Vocabularies,
    /// One row per catalog record, in catalog order
    pub rows: Vec<Vec<f64>>,
}

impl FeatureSpace {
    /// Width of every row
    pub fn dimension(&self) -> usize {
        NUMERIC_COLUMNS + self.vocabularies.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Human-readable column names, in column order
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ["rating", "critic_score", "votes", "year"]
            .into_iter()
            .map(String::from)
            .collect();
        let v = &self.vocabularies;
        names.extend(v.directors.terms().iter().map(|t| format!("director:{t}")));
        names.extend(v.cast.terms().iter().map(|t| format!("cast:{t}")));
        names.extend(v.genres.terms().iter().map(|t| format!("genre:{t}")));
        names
    }
}

/// Builds a [`FeatureSpace`] from a catalog.
///
/// By default the active [`FeatureSet`] follows the columns the catalog
/// carries; `with_features` overrides that.
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    features: Option<FeatureSet>,
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict or widen the optional contributions
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = Some(features);
        self
    }

    /// Compute feature rows for every movie in parallel.
    ///
    /// Rows come back in catalog order.
    pub fn build(&self, catalog: &Catalog) -> FeatureSpace {
        let features = self
            .features
            .unwrap_or_else(|| FeatureSet::for_catalog(catalog));
        let vocabularies = Vocabularies::build(catalog, features);
        let dimension = NUMERIC_COLUMNS + vocabularies.len();

        let rows: Vec<Vec<f64>> = catalog
            .records()
            .par_iter()
            .map(|movie| build_row(movie, &vocabularies, features, dimension))
            .collect();

        info!(
            "Built {} feature rows of dimension {} ({} directors, {} cast, {} genres)",
            rows.len(),
            dimension,
            vocabularies.directors.len(),
            vocabularies.cast.len(),
            vocabularies.genres.len()
        );

        FeatureSpace {
            features,
            vocabularies,
            rows,
        }
    }
}

/// Build a feature space with the catalog's own feature set
pub fn build_feature_space(catalog: &Catalog) -> FeatureSpace {
    FeatureBuilder::new().build(catalog)
}

fn build_row(
    movie: &MovieRecord,
    vocabularies: &Vocabularies,
    features: FeatureSet,
    dimension: usize,
) -> Vec<f64> {
    let mut row = vec![0.0; dimension];

    row[RATING] = movie.rating.unwrap_or(0.0);
    row[CRITIC_SCORE] = movie.critic_score.unwrap_or(0.0);
    row[VOTES] = clean_votes(movie.votes.as_deref());
    row[YEAR] = record_year(movie) as f64;

    if features.contains(OptionalFeature::Director) {
        let director = movie.director.as_deref().and_then(normalize_name);
        if let Some(pos) = director.and_then(|d| vocabularies.directors.position(&d)) {
            row[vocabularies.director_offset() + pos] = 1.0;
        }
    }

    if features.contains(OptionalFeature::Cast) {
        for member in normalize_list(movie.cast.as_deref()) {
            if let Some(pos) = vocabularies.cast.position(&member) {
                row[vocabularies.cast_offset() + pos] = 1.0;
            }
        }
    }

    if features.contains(OptionalFeature::Genre) {
        for genre in movie.genre_list() {
            if let Some(pos) = vocabularies.genres.position(genre) {
                row[vocabularies.genre_offset() + pos] = 1.0;
            }
        }
    }

    row
}
