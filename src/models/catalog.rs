use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A single movie known to the recommender
///
/// The entry's position in the [`Catalog`] is its row in the similarity matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    /// TMDB movie ID, used for poster lookups
    pub movie_id: i64,
    pub title: String,
}

impl CatalogEntry {
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

/// Ordered, immutable list of movies
///
/// Titles are not guaranteed unique; lookups resolve to the first match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the row index of the first entry whose title matches exactly
    pub fn resolve_index(&self, title: &str) -> AppResult<usize> {
        self.entries
            .iter()
            .position(|entry| entry.title == title)
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' is not in the catalog", title)))
    }

    /// Returns the entry at a 0-based row index
    pub fn row_at(&self, index: usize) -> AppResult<&CatalogEntry> {
        self.entries
            .get(index)
            .ok_or(AppError::Index(index, self.entries.len()))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.iter().any(|entry| entry.title == title)
    }

    /// Titles in row order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.title.as_str())
    }
}
