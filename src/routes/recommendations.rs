use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Recommendation,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: Option<String>,
}

/// Handler for recommendations endpoint
///
/// An unknown title still answers 200, with empty lists and a message.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Recommendation>> {
    let title = params
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| {
            AppError::InvalidInput("Movie title is missing or empty".to_string())
        })?;

    tracing::info!(
        request_id = %request_id,
        title = %title,
        "Processing recommendation request"
    );

    let recommendation = state.recommender.recommend(&title).await?;

    Ok(Json(recommendation))
}
