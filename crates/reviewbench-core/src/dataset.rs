//! The JSON array file handed from the generator to both loaders.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Category, Review, MAX_RATING, MIN_RATING};

/// Read a JSON array of records. A missing file is reported as
/// [`Error::MissingInput`]; anything unparsable as [`Error::Dataset`].
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::MissingInput(path.to_path_buf())),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content).map_err(|e| Error::Dataset { path: path.to_path_buf(), reason: e.to_string() })
}

pub fn read_reviews(path: &Path) -> Result<Vec<Review>> {
    let reviews: Vec<Review> = read_json_array(path)?;
    validate(path, &reviews)?;
    Ok(reviews)
}

/// Pretty-printed, with non-ASCII text written as-is.
pub fn write_reviews(path: &Path, reviews: &[Review]) -> Result<()> {
    write_json_array(path, reviews)
}

pub fn write_json_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, items)
        .map_err(|e| Error::Dataset { path: path.to_path_buf(), reason: e.to_string() })?;
    writer.flush()?;
    Ok(())
}

fn validate(path: &Path, reviews: &[Review]) -> Result<()> {
    let invalid = |reason: String| Error::Dataset { path: path.to_path_buf(), reason };
    let mut seen = HashSet::with_capacity(reviews.len());
    for (i, r) in reviews.iter().enumerate() {
        if !r.has_valid_rating() {
            return Err(invalid(format!("record {i} ({}): rating {} outside {MIN_RATING}..={MAX_RATING}", r.id, r.rating)));
        }
        if r.id.is_empty() {
            return Err(invalid(format!("record {i}: empty id")));
        }
        if !seen.insert(r.id.as_str()) {
            tracing::warn!(id = %r.id, "duplicate review id; stores will keep only one copy");
        }
    }
    Ok(())
}

/// Counts by category and by rating, as printed after generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetStats {
    pub total: usize,
    /// Sorted by category name.
    pub by_category: Vec<(Category, usize)>,
    /// One entry per rating 1..=5, zero-filled.
    pub by_rating: Vec<(u8, usize)>,
}

impl DatasetStats {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut by_category: BTreeMap<&'static str, (Category, usize)> = BTreeMap::new();
        let mut by_rating: BTreeMap<u8, usize> = (MIN_RATING..=MAX_RATING).map(|r| (r, 0)).collect();
        for r in reviews {
            by_category.entry(r.category.as_str()).or_insert((r.category, 0)).1 += 1;
            *by_rating.entry(r.rating).or_insert(0) += 1;
        }
        Self {
            total: reviews.len(),
            by_category: by_category.into_values().collect(),
            by_rating: by_rating.into_iter().collect(),
        }
    }
}
