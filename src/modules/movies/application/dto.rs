use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::assets::AssetUpload;
use crate::modules::catalog::domain::{Genre, Theater};
use crate::modules::movies::domain::{CastMember, Movie, MovieListing};

/// Write payload for both create and edit. The cast vector's order is the
/// authoritative display order; the assembler derives positions from it.
#[derive(Debug, Clone)]
pub struct MovieWriteRequest {
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    /// On create: `None` means no poster. On edit: `None` means keep the
    /// current one, `Some` replaces it in place.
    pub poster: Option<AssetUpload>,
    pub cast: Vec<CastSelection>,
    pub genre_ids: Vec<Uuid>,
    pub theater_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CastSelection {
    pub actor_id: Uuid,
    pub character_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
}

impl From<MovieListing> for MovieSummary {
    fn from(listing: MovieListing) -> Self {
        MovieSummary {
            id: listing.id,
            title: listing.title,
            release_date: listing.release_date,
            trailer: listing.trailer,
            poster_url: listing.poster_url,
        }
    }
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        MovieSummary {
            id: movie.id,
            title: movie.title.clone(),
            release_date: movie.release_date,
            trailer: movie.trailer.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
    pub genres: Vec<Genre>,
    pub theaters: Vec<Theater>,
    /// Ordered by position ascending.
    pub cast: Vec<CastMember>,
}

impl From<Movie> for MovieDetail {
    fn from(movie: Movie) -> Self {
        MovieDetail {
            id: movie.id,
            title: movie.title,
            release_date: movie.release_date,
            trailer: movie.trailer,
            poster_url: movie.poster_url,
            genres: movie.genres,
            theaters: movie.theaters,
            cast: movie.cast,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    pub now_showing: Vec<MovieSummary>,
    pub upcoming_releases: Vec<MovieSummary>,
}

/// Detail plus the complement sets, so an edit form can render both the
/// current selection and the remaining choices in one round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieEditContext {
    pub movie: MovieDetail,
    pub selected_genres: Vec<Genre>,
    pub unselected_genres: Vec<Genre>,
    pub selected_theaters: Vec<Theater>,
    pub unselected_theaters: Vec<Theater>,
    pub cast: Vec<CastMember>,
}

/// Full genre/theater universes for the create form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub genres: Vec<Genre>,
    pub theaters: Vec<Theater>,
}
