use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Actor, Genre, Theater};
use crate::shared::errors::AppResult;

/// Reference-table repositories. These back both the movie form options and
/// the referential checks the movie aggregate runs before assembly.

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn list_all(&self) -> AppResult<Vec<Genre>>;

    /// Returns the matching genres; callers diff against the requested ids to
    /// detect dangling references.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>>;

    async fn save(&self, genre: &Genre) -> AppResult<Genre>;

    async fn delete(&self, id: &Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait TheaterRepository: Send + Sync {
    async fn list_all(&self) -> AppResult<Vec<Theater>>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Theater>>;

    async fn save(&self, theater: &Theater) -> AppResult<Theater>;

    async fn delete(&self, id: &Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn list_all(&self) -> AppResult<Vec<Actor>>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Actor>>;

    async fn save(&self, actor: &Actor) -> AppResult<Actor>;

    async fn delete(&self, id: &Uuid) -> AppResult<bool>;
}
