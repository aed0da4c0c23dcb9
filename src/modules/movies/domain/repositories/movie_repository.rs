use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::modules::movies::domain::entities::{Movie, MovieListing};
use crate::shared::errors::AppResult;

#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Persist a new movie with all of its links in one transaction.
    async fn insert(&self, movie: &Movie) -> AppResult<()>;

    /// Persist an edited movie. Link sets are replaced by diffing against the
    /// stored rows (delete removed, insert added, rewrite retained) inside one
    /// transaction, so a concurrent reader sees either the old or the new
    /// cast ordering, never a partial one.
    async fn update(&self, movie: &Movie) -> AppResult<()>;

    /// Full aggregate: movie plus genres, theaters, and cast ordered by position.
    async fn find_detail(&self, id: &Uuid) -> AppResult<Option<Movie>>;

    /// Delete the movie and, through it, all of its link rows. Returns false
    /// when the id did not resolve.
    async fn delete(&self, id: &Uuid) -> AppResult<bool>;

    /// Movies releasing strictly after `after`, ascending, capped at `limit`.
    async fn upcoming_releases(&self, after: NaiveDate, limit: i64)
        -> AppResult<Vec<MovieListing>>;

    /// Movies with at least one theater association, ascending by release
    /// date, capped at `limit`.
    async fn now_showing(&self, limit: i64) -> AppResult<Vec<MovieListing>>;
}
