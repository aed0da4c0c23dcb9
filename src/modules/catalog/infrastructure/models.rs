use crate::schema::{actors, genres, theaters};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::modules::catalog::domain::{Actor, Genre, Theater};

// ============= GENRE MODELS =============

#[derive(Queryable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = genres)]
pub struct GenreModel {
    pub id: Uuid,
    pub name: String,
}

impl From<GenreModel> for Genre {
    fn from(m: GenreModel) -> Self {
        Genre {
            id: m.id,
            name: m.name,
        }
    }
}

impl From<&Genre> for GenreModel {
    fn from(g: &Genre) -> Self {
        GenreModel {
            id: g.id,
            name: g.name.clone(),
        }
    }
}

// ============= THEATER MODELS =============

#[derive(Queryable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = theaters)]
pub struct TheaterModel {
    pub id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<TheaterModel> for Theater {
    fn from(m: TheaterModel) -> Self {
        Theater {
            id: m.id,
            name: m.name,
            latitude: m.latitude,
            longitude: m.longitude,
        }
    }
}

impl From<&Theater> for TheaterModel {
    fn from(t: &Theater) -> Self {
        TheaterModel {
            id: t.id,
            name: t.name.clone(),
            latitude: t.latitude,
            longitude: t.longitude,
        }
    }
}

// ============= ACTOR MODELS =============

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = actors)]
pub struct ActorModel {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// For inserting new actors
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = actors)]
pub struct NewActor {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub picture_url: Option<String>,
}

// For updating existing actors (excludes id and created_at). The service
// passes the full resolved state, so None clears the column.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = actors)]
#[diesel(treat_none_as_null = true)]
pub struct ActorChangeset {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub picture_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ActorModel> for Actor {
    fn from(m: ActorModel) -> Self {
        Actor {
            id: m.id,
            name: m.name,
            birth_date: m.birth_date,
            picture_url: m.picture_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<&Actor> for NewActor {
    fn from(a: &Actor) -> Self {
        NewActor {
            id: a.id,
            name: a.name.clone(),
            birth_date: a.birth_date,
            picture_url: a.picture_url.clone(),
        }
    }
}
