pub mod posters;
pub mod providers;
pub mod recommendations;

pub use posters::PosterResolver;
pub use recommendations::Recommender;
