//! In-memory collaborators for service-level tests: repositories over maps,
//! an asset store that tracks live URLs, and a cache wrapper that records the
//! order of persistence/eviction events.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use marquee::modules::assets::{AssetStore, AssetUpload};
use marquee::modules::catalog::domain::{
    Actor, ActorRepository, Genre, GenreRepository, Theater, TheaterRepository,
};
use marquee::modules::movies::application::MovieService;
use marquee::modules::movies::domain::{Movie, MovieListing, MovieRepository};
use marquee::shared::cache::{CacheStats, MemoryResponseCache, ResponseCache};
use marquee::shared::errors::{AppError, AppResult};

#[derive(Default)]
pub struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

// ============= MOVIE REPOSITORY =============

#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: Mutex<HashMap<Uuid, Movie>>,
    log: Arc<EventLog>,
}

impl InMemoryMovieRepository {
    pub fn with_log(log: Arc<EventLog>) -> Self {
        Self {
            movies: Mutex::new(HashMap::new()),
            log,
        }
    }

    pub fn stored(&self, id: &Uuid) -> Option<Movie> {
        self.movies.lock().unwrap().get(id).cloned()
    }

    fn listing(movie: &Movie) -> MovieListing {
        MovieListing {
            id: movie.id,
            title: movie.title.clone(),
            release_date: movie.release_date,
            trailer: movie.trailer.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }

    fn sorted_listings(movies: Vec<&Movie>, limit: i64) -> Vec<MovieListing> {
        let mut listings: Vec<MovieListing> = movies.into_iter().map(Self::listing).collect();
        listings.sort_by_key(|l| l.release_date);
        listings.truncate(limit as usize);
        listings
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn insert(&self, movie: &Movie) -> AppResult<()> {
        self.log.record("movie.insert");
        self.movies.lock().unwrap().insert(movie.id, movie.clone());
        Ok(())
    }

    async fn update(&self, movie: &Movie) -> AppResult<()> {
        self.log.record("movie.update");
        let mut movies = self.movies.lock().unwrap();
        if !movies.contains_key(&movie.id) {
            return Err(AppError::NotFound(format!(
                "Movie with ID {} not found",
                movie.id
            )));
        }
        movies.insert(movie.id, movie.clone());
        Ok(())
    }

    async fn find_detail(&self, id: &Uuid) -> AppResult<Option<Movie>> {
        Ok(self.movies.lock().unwrap().get(id).cloned())
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        self.log.record("movie.delete");
        Ok(self.movies.lock().unwrap().remove(id).is_some())
    }

    async fn upcoming_releases(
        &self,
        after: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<MovieListing>> {
        let movies = self.movies.lock().unwrap();
        Ok(Self::sorted_listings(
            movies.values().filter(|m| m.release_date > after).collect(),
            limit,
        ))
    }

    async fn now_showing(&self, limit: i64) -> AppResult<Vec<MovieListing>> {
        let movies = self.movies.lock().unwrap();
        Ok(Self::sorted_listings(
            movies.values().filter(|m| !m.theaters.is_empty()).collect(),
            limit,
        ))
    }
}

// ============= REFERENCE REPOSITORIES =============

#[derive(Default)]
pub struct InMemoryGenreRepository {
    genres: Mutex<Vec<Genre>>,
}

impl InMemoryGenreRepository {
    pub fn seed(&self, name: &str) -> Genre {
        let genre = Genre::new(name.to_string());
        self.genres.lock().unwrap().push(genre.clone());
        genre
    }
}

#[async_trait]
impl GenreRepository for InMemoryGenreRepository {
    async fn list_all(&self) -> AppResult<Vec<Genre>> {
        let mut all = self.genres.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let all = self.genres.lock().unwrap();
        Ok(all.iter().filter(|g| ids.contains(&g.id)).cloned().collect())
    }

    async fn save(&self, genre: &Genre) -> AppResult<Genre> {
        let mut all = self.genres.lock().unwrap();
        all.retain(|g| g.id != genre.id);
        all.push(genre.clone());
        Ok(genre.clone())
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let mut all = self.genres.lock().unwrap();
        let before = all.len();
        all.retain(|g| g.id != *id);
        Ok(all.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryTheaterRepository {
    theaters: Mutex<Vec<Theater>>,
}

impl InMemoryTheaterRepository {
    pub fn seed(&self, name: &str) -> Theater {
        let theater = Theater::new(name.to_string());
        self.theaters.lock().unwrap().push(theater.clone());
        theater
    }
}

#[async_trait]
impl TheaterRepository for InMemoryTheaterRepository {
    async fn list_all(&self) -> AppResult<Vec<Theater>> {
        let mut all = self.theaters.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Theater>> {
        let all = self.theaters.lock().unwrap();
        Ok(all.iter().filter(|t| ids.contains(&t.id)).cloned().collect())
    }

    async fn save(&self, theater: &Theater) -> AppResult<Theater> {
        let mut all = self.theaters.lock().unwrap();
        all.retain(|t| t.id != theater.id);
        all.push(theater.clone());
        Ok(theater.clone())
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let mut all = self.theaters.lock().unwrap();
        let before = all.len();
        all.retain(|t| t.id != *id);
        Ok(all.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryActorRepository {
    actors: Mutex<Vec<Actor>>,
}

impl InMemoryActorRepository {
    pub fn seed(&self, name: &str) -> Actor {
        let actor = Actor::new(name.to_string());
        self.actors.lock().unwrap().push(actor.clone());
        actor
    }
}

#[async_trait]
impl ActorRepository for InMemoryActorRepository {
    async fn list_all(&self) -> AppResult<Vec<Actor>> {
        let mut all = self.actors.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Actor>> {
        let all = self.actors.lock().unwrap();
        Ok(all.iter().filter(|a| ids.contains(&a.id)).cloned().collect())
    }

    async fn save(&self, actor: &Actor) -> AppResult<Actor> {
        let mut all = self.actors.lock().unwrap();
        all.retain(|a| a.id != actor.id);
        all.push(actor.clone());
        Ok(actor.clone())
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let mut all = self.actors.lock().unwrap();
        let before = all.len();
        all.retain(|a| a.id != *id);
        Ok(all.len() < before)
    }
}

// ============= ASSET STORE =============

/// Tracks which URLs currently resolve, so tests can assert that a replaced
/// poster's old reference went dead.
pub struct FakeAssetStore {
    live: Mutex<HashSet<String>>,
    counter: AtomicU64,
    log: Arc<EventLog>,
}

impl FakeAssetStore {
    pub fn with_log(log: Arc<EventLog>) -> Self {
        Self {
            live: Mutex::new(HashSet::new()),
            counter: AtomicU64::new(0),
            log,
        }
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.lock().unwrap().contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetStore for FakeAssetStore {
    async fn store(&self, container: &str, upload: &AssetUpload) -> AppResult<String> {
        self.log.record("asset.store");
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let url = format!("/assets/{}/{}.{}", container, n, upload.extension);
        self.live.lock().unwrap().insert(url.clone());
        Ok(url)
    }

    async fn replace(
        &self,
        existing: Option<&str>,
        container: &str,
        upload: &AssetUpload,
    ) -> AppResult<String> {
        self.log.record("asset.replace");
        if let Some(url) = existing {
            self.live.lock().unwrap().remove(url);
        }
        self.store(container, upload).await
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        self.log.record("asset.delete");
        self.live.lock().unwrap().remove(url);
        Ok(())
    }
}

// ============= RECORDING CACHE =============

pub struct RecordingCache {
    inner: MemoryResponseCache,
    log: Arc<EventLog>,
}

impl RecordingCache {
    pub fn with_log(log: Arc<EventLog>) -> Self {
        Self {
            inner: MemoryResponseCache::default(),
            log,
        }
    }
}

impl ResponseCache for RecordingCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.get(key)
    }

    fn insert(&self, key: &str, tag: &str, payload: serde_json::Value) -> AppResult<()> {
        self.inner.insert(key, tag, payload)
    }

    fn evict_tag(&self, tag: &str) -> usize {
        self.log.record(format!("cache.evict:{}", tag));
        self.inner.evict_tag(tag)
    }

    fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

// ============= HARNESS =============

pub struct Harness {
    pub service: MovieService,
    pub movies: Arc<InMemoryMovieRepository>,
    pub genres: Arc<InMemoryGenreRepository>,
    pub theaters: Arc<InMemoryTheaterRepository>,
    pub actors: Arc<InMemoryActorRepository>,
    pub assets: Arc<FakeAssetStore>,
    pub log: Arc<EventLog>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Wire the service against a caller-supplied asset store (for mocked
    /// failure paths). The `assets` fake still exists but is unused.
    pub fn with_asset_store(store: Arc<dyn AssetStore>) -> Self {
        Self::build(Some(store))
    }

    fn build(store: Option<Arc<dyn AssetStore>>) -> Self {
        let log = Arc::new(EventLog::default());
        let movies = Arc::new(InMemoryMovieRepository::with_log(Arc::clone(&log)));
        let genres = Arc::new(InMemoryGenreRepository::default());
        let theaters = Arc::new(InMemoryTheaterRepository::default());
        let actors = Arc::new(InMemoryActorRepository::default());
        let assets = Arc::new(FakeAssetStore::with_log(Arc::clone(&log)));
        let cache = Arc::new(RecordingCache::with_log(Arc::clone(&log)));

        // Method-call clones so the concrete Arc coerces at the binding
        let movie_repo: Arc<dyn MovieRepository> = movies.clone();
        let genre_repo: Arc<dyn GenreRepository> = genres.clone();
        let theater_repo: Arc<dyn TheaterRepository> = theaters.clone();
        let actor_repo: Arc<dyn ActorRepository> = actors.clone();
        let asset_store: Arc<dyn AssetStore> = match store {
            Some(store) => store,
            None => assets.clone(),
        };

        let service = MovieService::new(
            movie_repo,
            genre_repo,
            theater_repo,
            actor_repo,
            asset_store,
            cache,
        );

        Self {
            service,
            movies,
            genres,
            theaters,
            actors,
            assets,
            log,
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
