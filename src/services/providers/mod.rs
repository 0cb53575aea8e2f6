//! Movie metadata provider abstraction
//!
//! Posters are resolved through a remote metadata service. The trait keeps the
//! recommender independent of the concrete API so tests can swap in a fake.

use crate::{error::AppResult, models::TmdbMovie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for a single movie by its external ID
    ///
    /// Timeouts must surface as errors for which `AppError::is_timeout` holds,
    /// so callers can report them separately from other transport failures.
    async fn fetch_movie(&self, movie_id: i64) -> AppResult<TmdbMovie>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
