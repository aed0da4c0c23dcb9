use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::assembler::{self, ResolvedSelections};
use super::dto::{
    FormOptions, LandingPage, MovieDetail, MovieEditContext, MovieSummary, MovieWriteRequest,
};
use crate::modules::assets::AssetStore;
use crate::modules::catalog::domain::{ActorRepository, GenreRepository, TheaterRepository};
use crate::modules::movies::domain::{CastMember, MovieRepository};
use crate::shared::cache::{ResponseCache, MOVIES_TAG};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;
use crate::{log_debug, log_info, log_warn};

const MOVIES_CONTAINER: &str = "movies";

/// Both landing lists are capped at this many entries.
pub const LANDING_PAGE_SIZE: i64 = 6;

/// Movie aggregate operations: writes run validate -> asset store -> assemble
/// -> single transactional persist -> tag eviction; reads go through the
/// tagged response cache and recompute on miss.
pub struct MovieService {
    movie_repo: Arc<dyn MovieRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    theater_repo: Arc<dyn TheaterRepository>,
    actor_repo: Arc<dyn ActorRepository>,
    asset_store: Arc<dyn AssetStore>,
    cache: Arc<dyn ResponseCache>,
}

impl MovieService {
    pub fn new(
        movie_repo: Arc<dyn MovieRepository>,
        genre_repo: Arc<dyn GenreRepository>,
        theater_repo: Arc<dyn TheaterRepository>,
        actor_repo: Arc<dyn ActorRepository>,
        asset_store: Arc<dyn AssetStore>,
        cache: Arc<dyn ResponseCache>,
    ) -> Self {
        Self {
            movie_repo,
            genre_repo,
            theater_repo,
            actor_repo,
            asset_store,
            cache,
        }
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    pub async fn create_movie(&self, request: MovieWriteRequest) -> AppResult<MovieSummary> {
        Validator::validate_movie_title(&request.title)?;
        let selections = self.resolve_selections(&request).await?;

        // Poster goes to the asset store before anything touches the database,
        // so a storage failure aborts the write with no row behind it
        let poster_url = match &request.poster {
            Some(upload) => {
                Validator::validate_asset_extension(&upload.extension)?;
                Some(self.asset_store.store(MOVIES_CONTAINER, upload).await?)
            }
            None => None,
        };

        let movie = assembler::assemble_new(&request, poster_url, selections);
        self.movie_repo.insert(&movie).await?;

        self.evict_movie_reads();
        log_info!("Created movie '{}' ({})", movie.title, movie.id);
        Ok(MovieSummary::from(&movie))
    }

    pub async fn update_movie(
        &self,
        id: &Uuid,
        request: MovieWriteRequest,
    ) -> AppResult<MovieDetail> {
        let existing = self
            .movie_repo
            .find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movie with ID {} not found", id)))?;

        Validator::validate_movie_title(&request.title)?;
        let selections = self.resolve_selections(&request).await?;

        // Replace-in-place: the old asset is gone once this returns, so it
        // must come after validation but before the transactional persist
        let new_poster_url = match &request.poster {
            Some(upload) => {
                Validator::validate_asset_extension(&upload.extension)?;
                let url = self
                    .asset_store
                    .replace(existing.poster_url.as_deref(), MOVIES_CONTAINER, upload)
                    .await?;
                Some(url)
            }
            None => None,
        };

        let movie = assembler::overlay(existing, &request, new_poster_url, selections);
        self.movie_repo.update(&movie).await?;

        self.evict_movie_reads();
        log_info!("Updated movie '{}' ({})", movie.title, movie.id);
        Ok(MovieDetail::from(movie))
    }

    pub async fn delete_movie(&self, id: &Uuid) -> AppResult<()> {
        let existing = self
            .movie_repo
            .find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movie with ID {} not found", id)))?;

        if !self.movie_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Movie with ID {} not found", id)));
        }

        // The row and its links are gone; a dangling poster file is only noise
        if let Some(poster_url) = &existing.poster_url {
            if let Err(e) = self.asset_store.delete(poster_url).await {
                log_warn!("Failed to delete poster for movie {}: {}", id, e);
            }
        }

        self.evict_movie_reads();
        log_info!("Deleted movie '{}' ({})", existing.title, id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub async fn get_movie(&self, id: &Uuid) -> AppResult<MovieDetail> {
        let cache_key = Self::detail_cache_key(id);
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(serde_json::from_value(cached)?);
        }

        let movie = self
            .movie_repo
            .find_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movie with ID {} not found", id)))?;

        let detail = MovieDetail::from(movie);
        self.cache
            .insert(&cache_key, MOVIES_TAG, serde_json::to_value(&detail)?)?;
        Ok(detail)
    }

    pub async fn get_landing(&self) -> AppResult<LandingPage> {
        const CACHE_KEY: &str = "movies:landing";

        if let Some(cached) = self.cache.get(CACHE_KEY) {
            return Ok(serde_json::from_value(cached)?);
        }

        let today = Utc::now().date_naive();
        let upcoming = self
            .movie_repo
            .upcoming_releases(today, LANDING_PAGE_SIZE)
            .await?;
        let showing = self.movie_repo.now_showing(LANDING_PAGE_SIZE).await?;

        let landing = LandingPage {
            now_showing: showing.into_iter().map(MovieSummary::from).collect(),
            upcoming_releases: upcoming.into_iter().map(MovieSummary::from).collect(),
        };

        self.cache
            .insert(CACHE_KEY, MOVIES_TAG, serde_json::to_value(&landing)?)?;
        Ok(landing)
    }

    /// Detail plus complement sets for the edit form. Re-queries the full
    /// genre/theater universes per request; fine while those tables stay small.
    pub async fn get_edit_context(&self, id: &Uuid) -> AppResult<MovieEditContext> {
        let movie = self.get_movie(id).await?;

        let all_genres = self.genre_repo.list_all().await?;
        let all_theaters = self.theater_repo.list_all().await?;

        let selected_genre_ids: HashSet<Uuid> = movie.genres.iter().map(|g| g.id).collect();
        let selected_theater_ids: HashSet<Uuid> = movie.theaters.iter().map(|t| t.id).collect();

        let unselected_genres = all_genres
            .into_iter()
            .filter(|g| !selected_genre_ids.contains(&g.id))
            .collect();
        let unselected_theaters = all_theaters
            .into_iter()
            .filter(|t| !selected_theater_ids.contains(&t.id))
            .collect();

        Ok(MovieEditContext {
            selected_genres: movie.genres.clone(),
            unselected_genres,
            selected_theaters: movie.theaters.clone(),
            unselected_theaters,
            cast: movie.cast.clone(),
            movie,
        })
    }

    pub async fn get_form_options(&self) -> AppResult<FormOptions> {
        let genres = self.genre_repo.list_all().await?;
        let theaters = self.theater_repo.list_all().await?;
        Ok(FormOptions { genres, theaters })
    }

    pub fn detail_cache_key(id: &Uuid) -> String {
        format!("movies:detail:{}", id)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Resolve the request's selections against the reference tables. Unknown
    /// ids are a validation failure naming the offenders; duplicate cast
    /// selections collapse to the first occurrence.
    async fn resolve_selections(
        &self,
        request: &MovieWriteRequest,
    ) -> AppResult<ResolvedSelections> {
        // Cast, in client order
        let mut seen_actors = HashSet::new();
        let mut cast_selections = Vec::new();
        for selection in &request.cast {
            Validator::validate_character_name(&selection.character_name)?;
            if seen_actors.insert(selection.actor_id) {
                cast_selections.push(selection.clone());
            }
        }

        let actor_ids: Vec<Uuid> = cast_selections.iter().map(|s| s.actor_id).collect();
        let actors = self.actor_repo.find_by_ids(&actor_ids).await?;
        let found_actor_ids: HashSet<Uuid> = actors.iter().map(|a| a.id).collect();
        Self::ensure_all_found("actor", &actor_ids, &found_actor_ids)?;

        let cast: Vec<CastMember> = cast_selections
            .iter()
            .map(|selection| {
                let actor_name = actors
                    .iter()
                    .find(|a| a.id == selection.actor_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_default();
                CastMember {
                    actor_id: selection.actor_id,
                    actor_name,
                    character_name: selection.character_name.clone(),
                    // Placeholder; the assembler rewrites every position
                    position: 0,
                }
            })
            .collect();

        let genres = self.genre_repo.find_by_ids(&request.genre_ids).await?;
        let found_genre_ids: HashSet<Uuid> = genres.iter().map(|g| g.id).collect();
        Self::ensure_all_found("genre", &request.genre_ids, &found_genre_ids)?;

        let theaters = self.theater_repo.find_by_ids(&request.theater_ids).await?;
        let found_theater_ids: HashSet<Uuid> = theaters.iter().map(|t| t.id).collect();
        Self::ensure_all_found("theater", &request.theater_ids, &found_theater_ids)?;

        Ok(ResolvedSelections {
            cast,
            genres,
            theaters,
        })
    }

    fn ensure_all_found(
        kind: &str,
        requested: &[Uuid],
        found: &HashSet<Uuid>,
    ) -> AppResult<()> {
        let missing: Vec<String> = requested
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(format!(
                "Unknown {} ids: {}",
                kind,
                missing.join(", ")
            )))
        }
    }

    /// Coarse-grained invalidation: every movie-tagged read goes, always after
    /// the persistence commit and before the caller gets its response.
    fn evict_movie_reads(&self) {
        let evicted = self.cache.evict_tag(MOVIES_TAG);
        log_debug!("Evicted {} cached movie reads", evicted);
    }
}
