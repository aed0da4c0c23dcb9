pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::dto::{
    CastSelection, FormOptions, LandingPage, MovieDetail, MovieEditContext, MovieSummary,
    MovieWriteRequest,
};
pub use application::{MovieService, LANDING_PAGE_SIZE};
pub use domain::{CastMember, Movie, MovieListing, MovieRepository};
pub use infrastructure::MovieRepositoryImpl;
