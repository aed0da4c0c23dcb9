use crate::schema::{movie_actors, movies};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::modules::movies::domain::{CastMember, Movie, MovieListing};

// ============= MOVIE MODELS =============

// For reading from database
#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = movies)]
pub struct MovieModel {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// For inserting new movies
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = movies)]
pub struct NewMovie {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
}

// For updating existing movies (excludes id and created_at). The assembled
// aggregate is authoritative for every scalar, so None writes NULL.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = movies)]
#[diesel(treat_none_as_null = true)]
pub struct MovieChangeset {
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Movie> for NewMovie {
    fn from(movie: &Movie) -> Self {
        NewMovie {
            id: movie.id,
            title: movie.title.clone(),
            release_date: movie.release_date,
            trailer: movie.trailer.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

impl From<&Movie> for MovieChangeset {
    fn from(movie: &Movie) -> Self {
        MovieChangeset {
            title: movie.title.clone(),
            release_date: movie.release_date,
            trailer: movie.trailer.clone(),
            poster_url: movie.poster_url.clone(),
            updated_at: Utc::now(),
        }
    }
}

/// Columns behind the landing-page projections; no entity materialization.
pub type MovieListingRow = (Uuid, String, NaiveDate, Option<String>, Option<String>);

pub fn listing_from_row(row: MovieListingRow) -> MovieListing {
    let (id, title, release_date, trailer, poster_url) = row;
    MovieListing {
        id,
        title,
        release_date,
        trailer,
        poster_url,
    }
}

// ============= CAST LINK =============

#[derive(Queryable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(MovieModel, foreign_key = movie_id))]
#[diesel(table_name = movie_actors)]
#[diesel(primary_key(movie_id, actor_id))]
pub struct MovieActorModel {
    pub movie_id: Uuid,
    pub actor_id: Uuid,
    pub character_name: String,
    pub position: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = movie_actors)]
pub struct NewMovieActor {
    pub movie_id: Uuid,
    pub actor_id: Uuid,
    pub character_name: String,
    pub position: i32,
}

impl NewMovieActor {
    pub fn from_member(movie_id: Uuid, member: &CastMember) -> Self {
        NewMovieActor {
            movie_id,
            actor_id: member.actor_id,
            character_name: member.character_name.clone(),
            position: member.position,
        }
    }
}
