use axum::{extract::State, Json};
use std::sync::Arc;

use crate::routes::AppState;

/// Handler listing every catalog title in row order
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let titles = state
        .recommender
        .catalog()
        .titles()
        .map(str::to_string)
        .collect();
    Json(titles)
}
