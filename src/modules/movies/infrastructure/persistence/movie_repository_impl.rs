use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use tokio::task;
use uuid::Uuid;

use super::super::models::{
    listing_from_row, MovieActorModel, MovieChangeset, MovieListingRow, MovieModel, NewMovie,
    NewMovieActor,
};
use crate::log_debug;
use crate::modules::catalog::infrastructure::models::{GenreModel, TheaterModel};
use crate::modules::movies::domain::{
    entities::{CastMember, Movie, MovieListing},
    repositories::MovieRepository,
};
use crate::schema::{actors, genres, movie_actors, movie_genres, movie_theaters, movies, theaters};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::Database;

pub struct MovieRepositoryImpl {
    db: Arc<Database>,
}

impl MovieRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Diff the stored cast rows against the aggregate's cast: delete removed
    /// actors, upsert the rest with their freshly assigned positions. Runs
    /// inside the caller's transaction.
    fn replace_cast_blocking(
        conn: &mut PgConnection,
        movie_id: Uuid,
        cast: &[CastMember],
    ) -> AppResult<()> {
        let existing_ids: Vec<Uuid> = movie_actors::table
            .filter(movie_actors::movie_id.eq(movie_id))
            .select(movie_actors::actor_id)
            .load::<Uuid>(conn)?;

        let new_ids: HashSet<Uuid> = cast.iter().map(|m| m.actor_id).collect();
        let removed: Vec<Uuid> = existing_ids
            .into_iter()
            .filter(|id| !new_ids.contains(id))
            .collect();

        if !removed.is_empty() {
            diesel::delete(
                movie_actors::table
                    .filter(movie_actors::movie_id.eq(movie_id))
                    .filter(movie_actors::actor_id.eq_any(&removed)),
            )
            .execute(conn)?;
        }

        for member in cast {
            diesel::insert_into(movie_actors::table)
                .values(NewMovieActor::from_member(movie_id, member))
                .on_conflict((movie_actors::movie_id, movie_actors::actor_id))
                .do_update()
                .set((
                    movie_actors::character_name.eq(&member.character_name),
                    movie_actors::position.eq(member.position),
                ))
                .execute(conn)?;
        }

        Ok(())
    }

    /// Same diff-and-replace for the unordered genre membership.
    fn replace_genres_blocking(
        conn: &mut PgConnection,
        movie_id: Uuid,
        genre_ids: &[Uuid],
    ) -> AppResult<()> {
        let existing: Vec<Uuid> = movie_genres::table
            .filter(movie_genres::movie_id.eq(movie_id))
            .select(movie_genres::genre_id)
            .load::<Uuid>(conn)?;

        let wanted: HashSet<Uuid> = genre_ids.iter().copied().collect();
        let existing_set: HashSet<Uuid> = existing.iter().copied().collect();

        let removed: Vec<Uuid> = existing
            .iter()
            .filter(|id| !wanted.contains(id))
            .copied()
            .collect();
        if !removed.is_empty() {
            diesel::delete(
                movie_genres::table
                    .filter(movie_genres::movie_id.eq(movie_id))
                    .filter(movie_genres::genre_id.eq_any(&removed)),
            )
            .execute(conn)?;
        }

        let added: Vec<(_, _)> = genre_ids
            .iter()
            .filter(|id| !existing_set.contains(id))
            .map(|id| {
                (
                    movie_genres::movie_id.eq(movie_id),
                    movie_genres::genre_id.eq(*id),
                )
            })
            .collect();
        if !added.is_empty() {
            diesel::insert_into(movie_genres::table)
                .values(&added)
                .on_conflict_do_nothing()
                .execute(conn)?;
        }

        Ok(())
    }

    fn replace_theaters_blocking(
        conn: &mut PgConnection,
        movie_id: Uuid,
        theater_ids: &[Uuid],
    ) -> AppResult<()> {
        let existing: Vec<Uuid> = movie_theaters::table
            .filter(movie_theaters::movie_id.eq(movie_id))
            .select(movie_theaters::theater_id)
            .load::<Uuid>(conn)?;

        let wanted: HashSet<Uuid> = theater_ids.iter().copied().collect();
        let existing_set: HashSet<Uuid> = existing.iter().copied().collect();

        let removed: Vec<Uuid> = existing
            .iter()
            .filter(|id| !wanted.contains(id))
            .copied()
            .collect();
        if !removed.is_empty() {
            diesel::delete(
                movie_theaters::table
                    .filter(movie_theaters::movie_id.eq(movie_id))
                    .filter(movie_theaters::theater_id.eq_any(&removed)),
            )
            .execute(conn)?;
        }

        let added: Vec<(_, _)> = theater_ids
            .iter()
            .filter(|id| !existing_set.contains(id))
            .map(|id| {
                (
                    movie_theaters::movie_id.eq(movie_id),
                    movie_theaters::theater_id.eq(*id),
                )
            })
            .collect();
        if !added.is_empty() {
            diesel::insert_into(movie_theaters::table)
                .values(&added)
                .on_conflict_do_nothing()
                .execute(conn)?;
        }

        Ok(())
    }

    fn load_aggregate_blocking(
        conn: &mut PgConnection,
        model: MovieModel,
    ) -> AppResult<Movie> {
        let cast_rows: Vec<(MovieActorModel, String)> = movie_actors::table
            .inner_join(actors::table)
            .filter(movie_actors::movie_id.eq(model.id))
            .order(movie_actors::position.asc())
            .select((movie_actors::all_columns, actors::name))
            .load::<(MovieActorModel, String)>(conn)?;

        let genre_models: Vec<GenreModel> = movie_genres::table
            .inner_join(genres::table)
            .filter(movie_genres::movie_id.eq(model.id))
            .order(genres::name.asc())
            .select(genres::all_columns)
            .load::<GenreModel>(conn)?;

        let theater_models: Vec<TheaterModel> = movie_theaters::table
            .inner_join(theaters::table)
            .filter(movie_theaters::movie_id.eq(model.id))
            .order(theaters::name.asc())
            .select(theaters::all_columns)
            .load::<TheaterModel>(conn)?;

        let cast = cast_rows
            .into_iter()
            .map(|(link, actor_name)| CastMember {
                actor_id: link.actor_id,
                actor_name,
                character_name: link.character_name,
                position: link.position,
            })
            .collect();

        Ok(Movie {
            id: model.id,
            title: model.title,
            release_date: model.release_date,
            trailer: model.trailer,
            poster_url: model.poster_url,
            cast,
            genres: genre_models.into_iter().map(Into::into).collect(),
            theaters: theater_models.into_iter().map(Into::into).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl MovieRepository for MovieRepositoryImpl {
    async fn insert(&self, movie: &Movie) -> AppResult<()> {
        let db = Arc::clone(&self.db);
        let new_movie = NewMovie::from(movie);
        let cast = movie.cast.clone();
        let genre_ids = movie.genre_ids();
        let theater_ids = movie.theater_ids();

        task::spawn_blocking(move || -> AppResult<()> {
            let mut conn = db.get_connection()?;

            conn.transaction::<(), AppError, _>(|conn| {
                let movie_id = new_movie.id;
                diesel::insert_into(movies::table)
                    .values(&new_movie)
                    .execute(conn)?;

                let cast_rows: Vec<NewMovieActor> = cast
                    .iter()
                    .map(|m| NewMovieActor::from_member(movie_id, m))
                    .collect();
                if !cast_rows.is_empty() {
                    diesel::insert_into(movie_actors::table)
                        .values(&cast_rows)
                        .execute(conn)?;
                }

                Self::replace_genres_blocking(conn, movie_id, &genre_ids)?;
                Self::replace_theaters_blocking(conn, movie_id, &theater_ids)?;

                log_debug!("Inserted movie {} with {} cast rows", movie_id, cast.len());
                Ok(())
            })
        })
        .await??;

        Ok(())
    }

    async fn update(&self, movie: &Movie) -> AppResult<()> {
        let db = Arc::clone(&self.db);
        let movie_id = movie.id;
        let changes = MovieChangeset::from(movie);
        let cast = movie.cast.clone();
        let genre_ids = movie.genre_ids();
        let theater_ids = movie.theater_ids();

        task::spawn_blocking(move || -> AppResult<()> {
            let mut conn = db.get_connection()?;

            conn.transaction::<(), AppError, _>(|conn| {
                let updated = diesel::update(movies::table.filter(movies::id.eq(movie_id)))
                    .set(&changes)
                    .execute(conn)?;
                if updated == 0 {
                    return Err(AppError::NotFound(format!(
                        "Movie with ID {} not found",
                        movie_id
                    )));
                }

                Self::replace_cast_blocking(conn, movie_id, &cast)?;
                Self::replace_genres_blocking(conn, movie_id, &genre_ids)?;
                Self::replace_theaters_blocking(conn, movie_id, &theater_ids)?;

                log_debug!("Updated movie {} with {} cast rows", movie_id, cast.len());
                Ok(())
            })
        })
        .await??;

        Ok(())
    }

    async fn find_detail(&self, id: &Uuid) -> AppResult<Option<Movie>> {
        let db = Arc::clone(&self.db);
        let id = *id;

        task::spawn_blocking(move || -> AppResult<Option<Movie>> {
            let mut conn = db.get_connection()?;

            let model = movies::table
                .filter(movies::id.eq(id))
                .first::<MovieModel>(&mut conn)
                .optional()?;

            match model {
                Some(m) => Ok(Some(Self::load_aggregate_blocking(&mut conn, m)?)),
                None => Ok(None),
            }
        })
        .await?
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let db = Arc::clone(&self.db);
        let id = *id;

        let deleted = task::spawn_blocking(move || -> AppResult<usize> {
            let mut conn = db.get_connection()?;

            // Links are removed explicitly rather than leaning on FK cascade,
            // so the aggregate's lifecycle is visible in one place
            conn.transaction::<usize, AppError, _>(|conn| {
                diesel::delete(movie_actors::table.filter(movie_actors::movie_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(movie_genres::table.filter(movie_genres::movie_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(movie_theaters::table.filter(movie_theaters::movie_id.eq(id)))
                    .execute(conn)?;
                let n = diesel::delete(movies::table.filter(movies::id.eq(id))).execute(conn)?;
                Ok(n)
            })
        })
        .await??;

        Ok(deleted > 0)
    }

    async fn upcoming_releases(
        &self,
        after: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<MovieListing>> {
        let db = Arc::clone(&self.db);

        let rows = task::spawn_blocking(move || -> AppResult<Vec<MovieListingRow>> {
            let mut conn = db.get_connection()?;
            let rows = movies::table
                .filter(movies::release_date.gt(after))
                .order(movies::release_date.asc())
                .limit(limit)
                .select((
                    movies::id,
                    movies::title,
                    movies::release_date,
                    movies::trailer,
                    movies::poster_url,
                ))
                .load::<MovieListingRow>(&mut conn)?;
            Ok(rows)
        })
        .await??;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }

    async fn now_showing(&self, limit: i64) -> AppResult<Vec<MovieListing>> {
        let db = Arc::clone(&self.db);

        let rows = task::spawn_blocking(move || -> AppResult<Vec<MovieListingRow>> {
            let mut conn = db.get_connection()?;
            // The join keeps only movies with at least one theater link
            let rows = movies::table
                .inner_join(movie_theaters::table)
                .select((
                    movies::id,
                    movies::title,
                    movies::release_date,
                    movies::trailer,
                    movies::poster_url,
                ))
                .distinct()
                .order(movies::release_date.asc())
                .limit(limit)
                .load::<MovieListingRow>(&mut conn)?;
            Ok(rows)
        })
        .await??;

        Ok(rows.into_iter().map(listing_from_row).collect())
    }
}
