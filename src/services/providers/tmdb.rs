//! TMDB API provider
//!
//! Looks up movie details via GET /movie/{id}. Only the poster path is used
//! downstream. Every request is bounded by the client-wide timeout.

use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::TmdbMovie,
    services::providers::MetadataProvider,
};

const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.poster_timeout(),
        )
    }

    fn movie_url(&self, movie_id: i64) -> String {
        format!("{}/movie/{}", self.api_url, movie_id)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_movie(&self, movie_id: i64) -> AppResult<TmdbMovie> {
        // Strip the URL from transport errors, it carries the API key.
        let response = self
            .http_client
            .get(self.movie_url(movie_id))
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                movie_id = movie_id,
                status = %status,
                body = %body,
                "TMDB API error response"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}",
                status
            )));
        }

        let movie: TmdbMovie = response.json().await.map_err(transport_error)?;

        tracing::debug!(
            movie_id = movie_id,
            has_poster = movie.poster_path.is_some(),
            provider = "tmdb",
            "Movie metadata fetched"
        );

        Ok(movie)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

/// Timeouts become `AppError::Timeout`, everything else `AppError::HttpClient`
fn transport_error(e: reqwest::Error) -> AppError {
    let e = e.without_url();
    if e.is_timeout() {
        AppError::Timeout(e.to_string())
    } else {
        AppError::HttpClient(e)
    }
}
