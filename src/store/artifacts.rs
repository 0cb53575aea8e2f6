use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::models::{Catalog, SimilarityMatrix};

pub const MOVIE_LIST_FILE: &str = "movie_list.bin";
pub const SIMILARITY_FILE: &str = "similarity.bin";

/// Catalog and similarity matrix, loaded once and shared read-only
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub catalog: Arc<Catalog>,
    pub similarity: Arc<SimilarityMatrix>,
}

impl ModelArtifacts {
    /// Pairs a catalog with its matrix after checking the shapes agree
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> AppResult<Self> {
        similarity.ensure_dim(catalog.len())?;
        Ok(Self {
            catalog: Arc::new(catalog),
            similarity: Arc::new(similarity),
        })
    }

    /// Loads `movie_list.bin` and `similarity.bin` from `model_dir`
    ///
    /// Both files must exist before either is read.
    pub fn load(model_dir: &Path) -> AppResult<Self> {
        let movie_file = model_dir.join(MOVIE_LIST_FILE);
        let sim_file = model_dir.join(SIMILARITY_FILE);

        if !movie_file.exists() || !sim_file.exists() {
            return Err(AppError::Storage(format!(
                "Model files not found. Ensure {} and {} exist in '{}'",
                MOVIE_LIST_FILE,
                SIMILARITY_FILE,
                model_dir.display()
            )));
        }

        let catalog: Catalog = read_artifact(&movie_file)?;
        let similarity = read_artifact::<SimilarityMatrix>(&sim_file)?.validated()?;
        let artifacts = Self::new(catalog, similarity)?;

        tracing::info!(
            movies = artifacts.catalog.len(),
            model_dir = %model_dir.display(),
            "Loaded model artifacts"
        );

        Ok(artifacts)
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let data = std::fs::read(path)
        .map_err(|e| AppError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    bincode::deserialize(&data)
        .map_err(|e| AppError::Storage(format!("Failed to decode {}: {}", path.display(), e)))
}
