pub mod entities;
pub mod repositories;
pub mod services;

// Re-exports for easy access
pub use entities::{CastMember, Movie, MovieListing};
pub use repositories::MovieRepository;
