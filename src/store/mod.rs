pub mod artifacts;

pub use artifacts::ModelArtifacts;
pub use artifacts::{MOVIE_LIST_FILE, SIMILARITY_FILE};
