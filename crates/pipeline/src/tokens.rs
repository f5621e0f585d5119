//! Normalization of the categorical text fields.
//!
//! Each field has its own rule and they are intentionally not unified:
//! genre *features* keep the source spelling, while genre *matching* folds
//! case and strips spaces and hyphens so that `"Sci-Fi"` and `"sci fi"` agree.

use data_loader::split_list;
use std::collections::BTreeSet;

/// Genre set used for overlap tests and explanations.
///
/// Example: `"Sci-Fi, Film Noir"` -> `{"filmnoir", "scifi"}`
pub fn normalize_genres(raw: Option<&str>) -> BTreeSet<String> {
    match raw {
        Some(raw) => raw
            .split(',')
            .map(|g| {
                g.to_lowercase()
                    .chars()
                    .filter(|c| *c != '-' && *c != ' ')
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .filter(|g| !g.is_empty())
            .collect(),
        None => BTreeSet::new(),
    }
}

/// Lower-cased, trimmed name. Blank names are treated as missing.
pub fn normalize_name(raw: &str) -> Option<String> {
    let name = raw.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Lower-cased members of a comma-separated list (cast, tags)
pub fn normalize_list(raw: Option<&str>) -> BTreeSet<String> {
    split_list(raw)
        .into_iter()
        .filter_map(normalize_name)
        .collect()
}
