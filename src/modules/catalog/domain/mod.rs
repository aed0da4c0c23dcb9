pub mod entities;
pub mod repositories;

// Re-exports for easy access
pub use entities::{Actor, Genre, Theater};
pub use repositories::{ActorRepository, GenreRepository, TheaterRepository};
