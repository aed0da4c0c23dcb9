use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::catalog::domain::{Genre, Theater};

/// Movie aggregate root. Owns its cast/genre/theater links: they have no
/// lifecycle outside the movie and are replaced wholesale on every edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
    /// Ordered cast; `position` mirrors the index and is rewritten on every write.
    pub cast: Vec<CastMember>,
    pub genres: Vec<Genre>,
    pub theaters: Vec<Theater>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub actor_id: Uuid,
    pub actor_name: String,
    pub character_name: String,
    pub position: i32,
}

/// Lightweight row for list projections (landing page); no link loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListing {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
}

impl Movie {
    pub fn new(title: String, release_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            release_date,
            trailer: None,
            poster_url: None,
            cast: Vec::new(),
            genres: Vec::new(),
            theaters: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn genre_ids(&self) -> Vec<Uuid> {
        self.genres.iter().map(|g| g.id).collect()
    }

    pub fn theater_ids(&self) -> Vec<Uuid> {
        self.theaters.iter().map(|t| t.id).collect()
    }
}
