//! Error types for the data-loader crate.
//!
//! Only failures that make the whole catalog unusable are errors here.
//! Malformed individual cells (a vote count of `"n/a"`, a year of `"19xx"`)
//! are recovered where they are read and never surface as a `CatalogError`.

use thiserror::Error;

/// Errors that can occur while loading a movie catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be found
    #[error("Catalog file not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the catalog
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV structure itself is broken (unbalanced quotes, bad UTF-8, ...)
    #[error("CSV error at row {row} in {file}: {reason}")]
    Csv {
        file: String,
        row: u64,
        reason: String,
    },

    /// The CSV header row could not be read
    #[error("Could not read header row of {file}: {reason}")]
    Header { file: String, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
