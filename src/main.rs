use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_recommender::{
    config::Config,
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, PosterResolver, Recommender},
    store::ModelArtifacts,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .init();

    // Missing credentials or model files stop the process before it serves anything
    let config = Config::from_env().context("Failed to resolve configuration")?;
    let artifacts =
        ModelArtifacts::load(&config.model_dir).context("Failed to load model artifacts")?;

    let provider = TmdbProvider::from_config(&config).context("Failed to build TMDB client")?;
    let posters = PosterResolver::from_config(Arc::new(provider), &config);
    let recommender = Recommender::new(&artifacts, posters);

    let app = create_router(AppState::new(recommender));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(
        address = %address,
        movies = artifacts.catalog.len(),
        poster_timeout_secs = config.poster_timeout_secs,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
