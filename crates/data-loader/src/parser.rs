//! Parser for catalog CSV files.
//!
//! Expected header (any subset, any order, unknown columns ignored):
//!
//! ```text
//! Title,Votes,Year,IMDb Rating,Meta Score,Genre,Director,Stars,Tags,Poster URL
//! ```
//!
//! Every cell is read as text first. Numeric cells that do not parse are
//! treated as absent rather than failing the row.

use crate::error::{CatalogError, Result};
use crate::types::{Catalog, Column, ColumnSet, MovieRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// One CSV row exactly as it appears in the file.
///
/// Columns missing from the header fall back to `None` through `#[serde(default)]`.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Votes", default)]
    votes: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "IMDb Rating", default)]
    rating: Option<String>,
    #[serde(rename = "Meta Score", default)]
    critic_score: Option<String>,
    #[serde(rename = "Genre", default)]
    genres: Option<String>,
    #[serde(rename = "Director", default)]
    director: Option<String>,
    #[serde(rename = "Stars", default)]
    cast: Option<String>,
    #[serde(rename = "Tags", default)]
    tags: Option<String>,
    #[serde(rename = "Poster URL", default)]
    poster_url: Option<String>,
}

/// Parse a catalog file from disk
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CatalogError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CatalogError::IoError(e),
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let catalog = parse_catalog_reader(file, &name)?;
    info!(
        "Loaded {} movies from {} (columns: {})",
        catalog.len(),
        name,
        catalog
            .columns()
            .iter()
            .map(Column::header)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(catalog)
}

/// Parse a catalog from any reader. `source` is only used in error messages.
pub fn parse_catalog_reader<R: Read>(reader: R, source: &str) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: ColumnSet = reader
        .headers()
        .map_err(|e| CatalogError::Header {
            file: source.to_string(),
            reason: e.to_string(),
        })?
        .iter()
        .filter_map(Column::from_header)
        .collect();

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<CatalogRow>().enumerate() {
        let row = row.map_err(|e| CatalogError::Csv {
            file: source.to_string(),
            row: e.position().map(|p| p.line()).unwrap_or(idx as u64 + 2),
            reason: e.to_string(),
        })?;

        // Line numbers are 1-based and the header occupies line 1
        let line_no = idx + 2;
        match into_record(row, line_no) {
            Some(record) => records.push(record),
            None => warn!("Skipping row at line {} in {}: missing title", line_no, source),
        }
    }

    Ok(Catalog::with_columns(records, columns))
}

fn into_record(row: CatalogRow, line_no: usize) -> Option<MovieRecord> {
    let title = non_empty(row.title)?;
    Some(MovieRecord {
        rating: parse_number("IMDb Rating", non_empty(row.rating), line_no),
        critic_score: parse_number("Meta Score", non_empty(row.critic_score), line_no),
        votes: non_empty(row.votes),
        year: non_empty(row.year),
        genres: non_empty(row.genres),
        tags: non_empty(row.tags),
        director: non_empty(row.director),
        cast: non_empty(row.cast),
        poster_url: non_empty(row.poster_url),
        title,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a numeric cell. Unparseable or non-finite values are dropped.
fn parse_number(field: &str, value: Option<String>, line_no: usize) -> Option<f64> {
    let value = value?;
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            debug!("Ignoring malformed {} {:?} at line {}", field, value, line_no);
            None
        }
    }
}
