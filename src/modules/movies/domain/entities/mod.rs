mod movie;

pub use movie::{CastMember, Movie, MovieListing};
