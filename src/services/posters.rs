use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppError,
    models::Poster,
    services::providers::MetadataProvider,
};

pub const TIMEOUT_NOTICE: &str = "Request timed out while fetching poster";

/// Resolves poster image URLs, falling back to a placeholder on any failure
///
/// Resolution never fails: the caller always gets a URL to render, plus a
/// notice when the lookup went wrong.
#[derive(Clone)]
pub struct PosterResolver {
    provider: Arc<dyn MetadataProvider>,
    image_base_url: String,
    placeholder_url: String,
}

impl PosterResolver {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        image_base_url: String,
        placeholder_url: String,
    ) -> Self {
        Self {
            provider,
            image_base_url,
            placeholder_url,
        }
    }

    pub fn from_config(provider: Arc<dyn MetadataProvider>, config: &Config) -> Self {
        Self::new(
            provider,
            config.tmdb_image_url.clone(),
            config.placeholder_poster_url.clone(),
        )
    }

    fn placeholder(&self, notice: Option<String>) -> Poster {
        Poster {
            url: self.placeholder_url.clone(),
            notice,
        }
    }

    fn image_url(&self, poster_path: &str) -> String {
        format!("{}/{}", self.image_base_url, poster_path)
    }

    /// Resolves the poster for one movie with a single upstream request
    pub async fn resolve(&self, movie_id: i64) -> Poster {
        match self.provider.fetch_movie(movie_id).await {
            Ok(movie) => match movie.poster_path.as_deref() {
                Some(path) if !path.is_empty() => Poster {
                    url: self.image_url(path),
                    notice: None,
                },
                _ => {
                    tracing::debug!(movie_id = movie_id, "No poster path, using placeholder");
                    self.placeholder(None)
                }
            },
            Err(e) => {
                let notice = failure_notice(&e);
                tracing::warn!(
                    movie_id = movie_id,
                    provider = self.provider.name(),
                    error = %e,
                    timeout = e.is_timeout(),
                    "Poster fetch failed, using placeholder"
                );
                self.placeholder(Some(notice))
            }
        }
    }

    /// Resolves posters for a ranked list of movies, preserving order
    ///
    /// Each distinct ID is fetched once. Lookups run as concurrent tasks and are
    /// joined in input order. A repeated ID reuses the first URL without
    /// repeating its notice.
    pub async fn resolve_all(&self, movie_ids: &[i64]) -> Vec<Poster> {
        let mut unique = Vec::new();
        for &movie_id in movie_ids {
            if !unique.contains(&movie_id) {
                unique.push(movie_id);
            }
        }

        let tasks: Vec<_> = unique
            .into_iter()
            .map(|movie_id| {
                let resolver = self.clone();
                let task = tokio::spawn(async move { resolver.resolve(movie_id).await });
                (movie_id, task)
            })
            .collect();

        let mut resolved = HashMap::new();
        for (movie_id, task) in tasks {
            let poster = match task.await {
                Ok(poster) => poster,
                Err(e) => {
                    tracing::error!(error = %e, movie_id = movie_id, "Poster task join error");
                    self.placeholder(Some(failure_notice(&AppError::Internal(e.to_string()))))
                }
            };
            resolved.insert(movie_id, poster);
        }

        let mut reported = HashSet::new();
        movie_ids
            .iter()
            .map(|movie_id| {
                let poster = resolved
                    .get(movie_id)
                    .cloned()
                    .unwrap_or_else(|| self.placeholder(None));
                if reported.insert(*movie_id) {
                    poster
                } else {
                    Poster {
                        notice: None,
                        ..poster
                    }
                }
            })
            .collect()
    }
}

/// User-facing message for a failed lookup
fn failure_notice(error: &AppError) -> String {
    if error.is_timeout() {
        TIMEOUT_NOTICE.to_string()
    } else {
        format!("Error fetching poster: {}", error)
    }
}
