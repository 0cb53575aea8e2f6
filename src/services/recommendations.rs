use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, RankedMovie, Recommendation, SimilarityMatrix},
    services::posters::PosterResolver,
    store::ModelArtifacts,
};

/// Number of recommendations returned per query
pub const TOP_K: usize = 5;

pub const NOT_FOUND_MESSAGE: &str = "Selected movie not found in the dataset.";

/// Ranks catalog rows by similarity and attaches posters
///
/// Holds the loaded catalog and matrix read-only; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityMatrix>,
    posters: PosterResolver,
}

impl Recommender {
    pub fn new(artifacts: &ModelArtifacts, posters: PosterResolver) -> Self {
        Self {
            catalog: artifacts.catalog.clone(),
            similarity: artifacts.similarity.clone(),
            posters,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the `TOP_K` nearest neighbours of `title`, best first
    ///
    /// Fails with `NotFound` when the title is not in the catalog.
    pub fn rank(&self, title: &str) -> AppResult<Vec<RankedMovie>> {
        let query_index = self.catalog.resolve_index(title)?;
        let scores = self.similarity.row(query_index)?;

        top_neighbours(scores, TOP_K)
            .into_iter()
            .map(|(row_index, score)| {
                let entry = self.catalog.row_at(row_index)?;
                Ok(RankedMovie {
                    row_index,
                    movie_id: entry.movie_id,
                    title: entry.title.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Recommends movies similar to `title`, with one poster per result
    ///
    /// An unknown title is not an error: the result is empty and carries a
    /// notice. Poster failures degrade to the placeholder URL. Only a broken
    /// catalog/matrix pairing surfaces as `Err`.
    pub async fn recommend(&self, title: &str) -> AppResult<Recommendation> {
        let ranked = match self.rank(title) {
            Ok(ranked) => ranked,
            Err(AppError::NotFound(reason)) => {
                tracing::warn!(
                    title = %title,
                    reason = %reason,
                    "Recommendation for unknown title"
                );
                return Ok(Recommendation::empty_with_message(NOT_FOUND_MESSAGE));
            }
            Err(e) => return Err(e),
        };

        let movie_ids: Vec<i64> = ranked.iter().map(|movie| movie.movie_id).collect();
        let posters = self.posters.resolve_all(&movie_ids).await;

        let mut recommendation = Recommendation::default();
        for (movie, poster) in ranked.into_iter().zip(posters) {
            recommendation.titles.push(movie.title);
            recommendation.posters.push(poster.url);
            if let Some(notice) = poster.notice {
                recommendation.messages.push(notice);
            }
        }

        tracing::info!(
            title = %title,
            results = recommendation.len(),
            notices = recommendation.messages.len(),
            "Recommendations generated"
        );

        Ok(recommendation)
    }
}

/// Picks the `k` best-scoring rows after the top-ranked one
///
/// Rows are sorted by descending score with a stable sort, so equal scores keep
/// ascending row order. The first sorted row is dropped as the query's own
/// self-similarity entry. NaN scores rank last.
pub fn top_neighbours(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let key = |score: f32| if score.is_nan() { f32::NEG_INFINITY } else { score };

    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| key(b.1).partial_cmp(&key(a.1)).unwrap_or(Ordering::Equal));

    ranked.into_iter().skip(1).take(k).collect()
}
