pub mod modules;
mod schema;
pub mod shared;

use std::sync::Arc;

use modules::{
    assets::{AssetStore, LocalAssetStore},
    catalog::{
        application::CatalogService,
        domain::{ActorRepository, GenreRepository, TheaterRepository},
        infrastructure::{ActorRepositoryImpl, GenreRepositoryImpl, TheaterRepositoryImpl},
    },
    movies::{
        application::MovieService, domain::MovieRepository, infrastructure::MovieRepositoryImpl,
    },
};
use shared::cache::{MemoryResponseCache, ResponseCache};
use shared::errors::AppResult;
use shared::Database;

/// Composition root: pool, repositories, cache, asset store, and the two
/// application services wired together. The services are the crate's public
/// boundary; HTTP plumbing, if any, sits on top of them.
pub struct AppServices {
    pub movies: Arc<MovieService>,
    pub catalog: Arc<CatalogService>,
    pub cache: Arc<dyn ResponseCache>,
    db: Arc<Database>,
}

impl AppServices {
    /// Build the full service graph from the environment (`DATABASE_URL`,
    /// `ASSETS_ROOT`, `ASSETS_BASE_URL`) and run pending migrations.
    pub fn init() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        shared::utils::logger::init_logger();

        let db = Arc::new(Database::new()?);
        db.run_migrations()?;

        let cache: Arc<dyn ResponseCache> = Arc::new(MemoryResponseCache::default());
        let asset_store: Arc<dyn AssetStore> = Arc::new(LocalAssetStore::from_env());

        let movie_repo: Arc<dyn MovieRepository> =
            Arc::new(MovieRepositoryImpl::new(Arc::clone(&db)));
        let genre_repo: Arc<dyn GenreRepository> =
            Arc::new(GenreRepositoryImpl::new(Arc::clone(&db)));
        let theater_repo: Arc<dyn TheaterRepository> =
            Arc::new(TheaterRepositoryImpl::new(Arc::clone(&db)));
        let actor_repo: Arc<dyn ActorRepository> =
            Arc::new(ActorRepositoryImpl::new(Arc::clone(&db)));

        let movies = Arc::new(MovieService::new(
            movie_repo,
            Arc::clone(&genre_repo),
            Arc::clone(&theater_repo),
            Arc::clone(&actor_repo),
            Arc::clone(&asset_store),
            Arc::clone(&cache),
        ));

        let catalog = Arc::new(CatalogService::new(
            genre_repo,
            theater_repo,
            actor_repo,
            asset_store,
        ));

        Ok(Self {
            movies,
            catalog,
            cache,
            db,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
