use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod similarity;

pub use catalog::{Catalog, CatalogEntry};
pub use similarity::SimilarityMatrix;

/// Recommendations returned to the client
///
/// `titles` and `posters` are index-aligned and always the same length.
/// `messages` carries user-facing notices such as a missing title or a
/// poster that could not be fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub titles: Vec<String>,
    pub posters: Vec<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl Recommendation {
    /// Empty result carrying a single notice
    pub fn empty_with_message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// A ranked neighbour of the query movie
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMovie {
    pub row_index: usize,
    pub movie_id: i64,
    pub title: String,
    pub score: f32,
}

/// Resolved poster for one movie
///
/// `notice` is set when the lookup failed and `url` fell back to the
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poster {
    pub url: String,
    pub notice: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB response from GET /movie/{id}
///
/// Only the poster path is read; other fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TmdbMovie {
    #[serde(default)]
    pub poster_path: Option<String>,
}
