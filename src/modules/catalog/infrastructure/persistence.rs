use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use tokio::task;
use uuid::Uuid;

use super::models::{ActorChangeset, ActorModel, GenreModel, NewActor, TheaterModel};
use crate::log_debug;
use crate::modules::catalog::domain::{
    Actor, ActorRepository, Genre, GenreRepository, Theater, TheaterRepository,
};
use crate::schema::{actors, genres, theaters};
use crate::shared::errors::AppResult;
use crate::shared::Database;

pub struct GenreRepositoryImpl {
    db: Arc<Database>,
}

impl GenreRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for GenreRepositoryImpl {
    async fn list_all(&self) -> AppResult<Vec<Genre>> {
        let db = Arc::clone(&self.db);

        let models = task::spawn_blocking(move || -> AppResult<Vec<GenreModel>> {
            let mut conn = db.get_connection()?;
            let m = genres::table
                .order(genres::name.asc())
                .load::<GenreModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        Ok(models.into_iter().map(Genre::from).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        let models = task::spawn_blocking(move || -> AppResult<Vec<GenreModel>> {
            let mut conn = db.get_connection()?;
            let m = genres::table
                .filter(genres::id.eq_any(&ids))
                .load::<GenreModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        Ok(models.into_iter().map(Genre::from).collect())
    }

    async fn save(&self, genre: &Genre) -> AppResult<Genre> {
        let db = Arc::clone(&self.db);
        let model = GenreModel::from(genre);

        let saved = task::spawn_blocking(move || -> AppResult<GenreModel> {
            let mut conn = db.get_connection()?;
            let m = diesel::insert_into(genres::table)
                .values(&model)
                .on_conflict(genres::id)
                .do_update()
                .set(genres::name.eq(&model.name))
                .get_result::<GenreModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        log_debug!("Saved genre '{}' ({})", saved.name, saved.id);
        Ok(saved.into())
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let db = Arc::clone(&self.db);
        let id = *id;

        let deleted = task::spawn_blocking(move || -> AppResult<usize> {
            let mut conn = db.get_connection()?;
            let n = diesel::delete(genres::table.filter(genres::id.eq(id))).execute(&mut conn)?;
            Ok(n)
        })
        .await??;

        Ok(deleted > 0)
    }
}

pub struct TheaterRepositoryImpl {
    db: Arc<Database>,
}

impl TheaterRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TheaterRepository for TheaterRepositoryImpl {
    async fn list_all(&self) -> AppResult<Vec<Theater>> {
        let db = Arc::clone(&self.db);

        let models = task::spawn_blocking(move || -> AppResult<Vec<TheaterModel>> {
            let mut conn = db.get_connection()?;
            let m = theaters::table
                .order(theaters::name.asc())
                .load::<TheaterModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        Ok(models.into_iter().map(Theater::from).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Theater>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        let models = task::spawn_blocking(move || -> AppResult<Vec<TheaterModel>> {
            let mut conn = db.get_connection()?;
            let m = theaters::table
                .filter(theaters::id.eq_any(&ids))
                .load::<TheaterModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        Ok(models.into_iter().map(Theater::from).collect())
    }

    async fn save(&self, theater: &Theater) -> AppResult<Theater> {
        let db = Arc::clone(&self.db);
        let model = TheaterModel::from(theater);

        let saved = task::spawn_blocking(move || -> AppResult<TheaterModel> {
            let mut conn = db.get_connection()?;
            let m = diesel::insert_into(theaters::table)
                .values(&model)
                .on_conflict(theaters::id)
                .do_update()
                .set((
                    theaters::name.eq(&model.name),
                    theaters::latitude.eq(model.latitude),
                    theaters::longitude.eq(model.longitude),
                ))
                .get_result::<TheaterModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        log_debug!("Saved theater '{}' ({})", saved.name, saved.id);
        Ok(saved.into())
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let db = Arc::clone(&self.db);
        let id = *id;

        let deleted = task::spawn_blocking(move || -> AppResult<usize> {
            let mut conn = db.get_connection()?;
            let n =
                diesel::delete(theaters::table.filter(theaters::id.eq(id))).execute(&mut conn)?;
            Ok(n)
        })
        .await??;

        Ok(deleted > 0)
    }
}

pub struct ActorRepositoryImpl {
    db: Arc<Database>,
}

impl ActorRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActorRepository for ActorRepositoryImpl {
    async fn list_all(&self) -> AppResult<Vec<Actor>> {
        let db = Arc::clone(&self.db);

        let models = task::spawn_blocking(move || -> AppResult<Vec<ActorModel>> {
            let mut conn = db.get_connection()?;
            let m = actors::table
                .order(actors::name.asc())
                .load::<ActorModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        Ok(models.into_iter().map(Actor::from).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Actor>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        let models = task::spawn_blocking(move || -> AppResult<Vec<ActorModel>> {
            let mut conn = db.get_connection()?;
            let m = actors::table
                .filter(actors::id.eq_any(&ids))
                .load::<ActorModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        Ok(models.into_iter().map(Actor::from).collect())
    }

    async fn save(&self, actor: &Actor) -> AppResult<Actor> {
        let db = Arc::clone(&self.db);
        let new_actor = NewActor::from(actor);
        let changes = ActorChangeset {
            name: actor.name.clone(),
            birth_date: actor.birth_date,
            picture_url: actor.picture_url.clone(),
            updated_at: Utc::now(),
        };

        let saved = task::spawn_blocking(move || -> AppResult<ActorModel> {
            let mut conn = db.get_connection()?;
            let m = diesel::insert_into(actors::table)
                .values(&new_actor)
                .on_conflict(actors::id)
                .do_update()
                .set(&changes)
                .get_result::<ActorModel>(&mut conn)?;
            Ok(m)
        })
        .await??;

        log_debug!("Saved actor '{}' ({})", saved.name, saved.id);
        Ok(saved.into())
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let db = Arc::clone(&self.db);
        let id = *id;

        let deleted = task::spawn_blocking(move || -> AppResult<usize> {
            let mut conn = db.get_connection()?;
            let n = diesel::delete(actors::table.filter(actors::id.eq(id))).execute(&mut conn)?;
            Ok(n)
        })
        .await??;

        Ok(deleted > 0)
    }
}
