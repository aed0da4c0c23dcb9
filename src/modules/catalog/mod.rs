pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::CatalogService;
pub use domain::{Actor, ActorRepository, Genre, GenreRepository, Theater, TheaterRepository};
