//! Loading catalogs from files on disk.

use data_loader::{Catalog, CatalogError, Column};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_load_catalog_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "Title,Votes,IMDb Rating,Genre,Director")?;
    writeln!(file, "Heat (1995),712K,8.3,\"Action, Crime, Drama\",Michael Mann")?;
    writeln!(file, "Collateral (2004),600K,7.5,\"Action, Crime, Drama\",Michael Mann")?;

    let catalog = Catalog::load_from_file(file.path())?;

    assert_eq!(catalog.len(), 2);
    assert!(catalog.has(Column::Votes));
    assert!(!catalog.has(Column::Stars));
    assert_eq!(catalog.find_by_title("collateral"), Some(1));
    Ok(())
}

#[test]
fn test_missing_file_is_reported() {
    let err = Catalog::load_from_file(Path::new("does/not/exist.csv")).unwrap_err();
    assert!(matches!(err, CatalogError::FileNotFound { .. }));
}
