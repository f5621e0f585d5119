//! Core domain types for a movie catalog.
//!
//! A catalog is an ordered list of [`MovieRecord`]s plus the set of source
//! columns that were actually present when it was loaded. Catalog order is
//! significant: title lookup is "first match wins" and ranking ties are
//! broken by position.

use std::fmt;

// =============================================================================
// Columns
// =============================================================================

/// The columns a catalog file may carry.
///
/// Every column other than `Title` is optional. A column that is missing from
/// the source disables whatever depends on it instead of failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Votes,
    Year,
    ImdbRating,
    MetaScore,
    Genre,
    Director,
    Stars,
    Tags,
    PosterUrl,
}

impl Column {
    /// All known columns, in file order.
    pub const ALL: [Column; 10] = [
        Column::Title,
        Column::Votes,
        Column::Year,
        Column::ImdbRating,
        Column::MetaScore,
        Column::Genre,
        Column::Director,
        Column::Stars,
        Column::Tags,
        Column::PosterUrl,
    ];

    /// Header name used in the catalog CSV
    pub fn header(self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Votes => "Votes",
            Column::Year => "Year",
            Column::ImdbRating => "IMDb Rating",
            Column::MetaScore => "Meta Score",
            Column::Genre => "Genre",
            Column::Director => "Director",
            Column::Stars => "Stars",
            Column::Tags => "Tags",
            Column::PosterUrl => "Poster URL",
        }
    }

    /// Map a CSV header back to a column. Unknown headers are ignored by the loader.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL.into_iter().find(|c| c.header() == header)
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Small bit set of [`Column`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSet {
    bits: u16,
}

impl ColumnSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: Column) {
        self.bits |= column.bit();
    }

    pub fn with(mut self, column: Column) -> Self {
        self.insert(column);
        self
    }

    pub fn contains(&self, column: Column) -> bool {
        self.bits & column.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        let mut set = ColumnSet::empty();
        for column in iter {
            set.insert(column);
        }
        set
    }
}

// =============================================================================
// Movie records
// =============================================================================

/// One row of the catalog.
///
/// Text fields are kept as they appear in the source. Cleaning (vote counts
/// with a `K` suffix, release years hidden in titles) happens when features
/// are built, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieRecord {
    /// Lookup key. Not guaranteed unique.
    pub title: String,
    /// User rating (IMDb scale)
    pub rating: Option<f64>,
    /// Critic score (Metascore scale)
    pub critic_score: Option<f64>,
    /// Vote count as written in the source, e.g. `"1.2K"` or `"532"`
    pub votes: Option<String>,
    /// Explicit release year field, unparsed
    pub year: Option<String>,
    /// Comma-separated genres
    pub genres: Option<String>,
    /// Comma-separated free-text tags
    pub tags: Option<String>,
    pub director: Option<String>,
    /// Comma-separated cast members
    pub cast: Option<String>,
    pub poster_url: Option<String>,
}

impl MovieRecord {
    /// Create a record with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Genre names, trimmed, in source order
    pub fn genre_list(&self) -> Vec<&str> {
        split_list(self.genres.as_deref())
    }

    /// Tags, trimmed, in source order
    pub fn tag_list(&self) -> Vec<&str> {
        split_list(self.tags.as_deref())
    }

    /// Cast members, trimmed, in source order
    pub fn cast_list(&self) -> Vec<&str> {
        split_list(self.cast.as_deref())
    }

    /// Poster URL, only when it is an HTTP(S) link
    pub fn poster_url(&self) -> Option<&str> {
        self.poster_url
            .as_deref()
            .map(str::trim)
            .filter(|url| url.starts_with("http"))
    }
}

/// Split a comma-separated field, trimming entries and dropping empty ones.
///
/// Example: `" Drama, Crime ,,"` -> `["Drama", "Crime"]`
pub fn split_list(value: Option<&str>) -> Vec<&str> {
    match value {
        Some(v) => v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// An immutable snapshot of the movie catalog.
///
/// Movies are addressed by their position (`usize`) in the catalog; the
/// feature matrix built from a catalog uses the same row order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) records: Vec<MovieRecord>,
    pub(crate) columns: ColumnSet,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            columns: ColumnSet::empty().with(Column::Title),
        }
    }

    /// Build a catalog from in-memory records.
    ///
    /// A column counts as present when at least one record populates it.
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let mut columns = ColumnSet::empty().with(Column::Title);
        for record in &records {
            if record.votes.is_some() {
                columns.insert(Column::Votes);
            }
            if record.year.is_some() {
                columns.insert(Column::Year);
            }
            if record.rating.is_some() {
                columns.insert(Column::ImdbRating);
            }
            if record.critic_score.is_some() {
                columns.insert(Column::MetaScore);
            }
            if record.genres.is_some() {
                columns.insert(Column::Genre);
            }
            if record.director.is_some() {
                columns.insert(Column::Director);
            }
            if record.cast.is_some() {
                columns.insert(Column::Stars);
            }
            if record.tags.is_some() {
                columns.insert(Column::Tags);
            }
            if record.poster_url.is_some() {
                columns.insert(Column::PosterUrl);
            }
        }
        Self { records, columns }
    }

    /// Build a catalog with an explicit column set (what the file header declared)
    pub fn with_columns(records: Vec<MovieRecord>, columns: ColumnSet) -> Self {
        Self {
            records,
            columns: columns.with(Column::Title),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&MovieRecord> {
        self.records.get(index)
    }

    pub fn columns(&self) -> ColumnSet {
        self.columns
    }

    /// Whether the source carried `column`
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(column)
    }
}
