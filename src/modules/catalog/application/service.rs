use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::log_debug;
use crate::modules::assets::{AssetStore, AssetUpload};
use crate::modules::catalog::domain::{
    Actor, ActorRepository, Genre, GenreRepository, Theater, TheaterRepository,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;

const ACTORS_CONTAINER: &str = "actors";

/// CRUD over the reference tables the movie form selects from.
pub struct CatalogService {
    genre_repo: Arc<dyn GenreRepository>,
    theater_repo: Arc<dyn TheaterRepository>,
    actor_repo: Arc<dyn ActorRepository>,
    asset_store: Arc<dyn AssetStore>,
}

impl CatalogService {
    pub fn new(
        genre_repo: Arc<dyn GenreRepository>,
        theater_repo: Arc<dyn TheaterRepository>,
        actor_repo: Arc<dyn ActorRepository>,
        asset_store: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            genre_repo,
            theater_repo,
            actor_repo,
            asset_store,
        }
    }

    // ============= GENRES =============

    pub async fn create_genre(&self, name: String) -> AppResult<Genre> {
        Validator::validate_reference_name("Genre", &name, 100)?;
        self.genre_repo.save(&Genre::new(name)).await
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.genre_repo.list_all().await
    }

    pub async fn delete_genre(&self, id: &Uuid) -> AppResult<()> {
        if !self.genre_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Genre with ID {} not found", id)));
        }
        Ok(())
    }

    // ============= THEATERS =============

    pub async fn create_theater(
        &self,
        name: String,
        location: Option<(f64, f64)>,
    ) -> AppResult<Theater> {
        Validator::validate_reference_name("Theater", &name, 255)?;

        let mut theater = Theater::new(name);
        if let Some((latitude, longitude)) = location {
            theater = theater.with_location(latitude, longitude);
        }
        self.theater_repo.save(&theater).await
    }

    pub async fn list_theaters(&self) -> AppResult<Vec<Theater>> {
        self.theater_repo.list_all().await
    }

    pub async fn delete_theater(&self, id: &Uuid) -> AppResult<()> {
        if !self.theater_repo.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Theater with ID {} not found",
                id
            )));
        }
        Ok(())
    }

    // ============= ACTORS =============

    pub async fn create_actor(
        &self,
        name: String,
        birth_date: Option<NaiveDate>,
        picture: Option<AssetUpload>,
    ) -> AppResult<Actor> {
        Validator::validate_reference_name("Actor", &name, 255)?;

        let mut actor = Actor::new(name);
        if let Some(date) = birth_date {
            actor = actor.with_birth_date(date);
        }

        // Asset work happens before persistence so a storage failure leaves no row behind
        if let Some(upload) = picture {
            Validator::validate_asset_extension(&upload.extension)?;
            actor.picture_url = Some(self.asset_store.store(ACTORS_CONTAINER, &upload).await?);
        }

        self.actor_repo.save(&actor).await
    }

    pub async fn update_actor(
        &self,
        id: &Uuid,
        name: String,
        birth_date: Option<NaiveDate>,
        picture: Option<AssetUpload>,
    ) -> AppResult<Actor> {
        Validator::validate_reference_name("Actor", &name, 255)?;

        let mut actor = self
            .actor_repo
            .find_by_ids(std::slice::from_ref(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Actor with ID {} not found", id)))?;

        actor.name = name;
        actor.birth_date = birth_date;

        // A missing upload means "keep the current picture"
        if let Some(upload) = picture {
            Validator::validate_asset_extension(&upload.extension)?;
            let url = self
                .asset_store
                .replace(actor.picture_url.as_deref(), ACTORS_CONTAINER, &upload)
                .await?;
            actor.picture_url = Some(url);
        }

        log_debug!("Updating actor '{}' ({})", actor.name, actor.id);
        self.actor_repo.save(&actor).await
    }

    pub async fn list_actors(&self) -> AppResult<Vec<Actor>> {
        self.actor_repo.list_all().await
    }

    pub async fn delete_actor(&self, id: &Uuid) -> AppResult<()> {
        if !self.actor_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Actor with ID {} not found", id)));
        }
        Ok(())
    }
}
