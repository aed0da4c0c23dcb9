mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use common::{date, Harness};
use marquee::modules::assets::{AssetStore, AssetUpload};
use marquee::modules::movies::application::dto::{CastSelection, MovieWriteRequest};
use marquee::shared::errors::{AppError, AppResult};

fn request(title: &str, cast: Vec<(Uuid, &str)>) -> MovieWriteRequest {
    MovieWriteRequest {
        title: title.to_string(),
        release_date: date(2027, 3, 1),
        trailer: None,
        poster: None,
        cast: cast
            .into_iter()
            .map(|(actor_id, character_name)| CastSelection {
                actor_id,
                character_name: character_name.to_string(),
            })
            .collect(),
        genre_ids: Vec::new(),
        theater_ids: Vec::new(),
    }
}

fn poster(ext: &str) -> AssetUpload {
    AssetUpload::new(vec![0xff, 0xd8], ext)
}

#[tokio::test]
async fn create_assigns_dense_positions_in_submitted_order() {
    let h = Harness::new();
    let a = h.actors.seed("Alice Actor");
    let b = h.actors.seed("Bob Actor");

    let summary = h
        .service
        .create_movie(request("Dune", vec![(a.id, "Paul"), (b.id, "Leto")]))
        .await
        .unwrap();

    let stored = h.movies.stored(&summary.id).unwrap();
    assert_eq!(stored.cast.len(), 2);
    assert_eq!(stored.cast[0].actor_id, a.id);
    assert_eq!(stored.cast[0].position, 0);
    assert_eq!(stored.cast[0].actor_name, "Alice Actor");
    assert_eq!(stored.cast[1].actor_id, b.id);
    assert_eq!(stored.cast[1].position, 1);
}

#[tokio::test]
async fn edit_reorders_cast_and_reindexes() {
    let h = Harness::new();
    let a = h.actors.seed("A");
    let b = h.actors.seed("B");

    let summary = h
        .service
        .create_movie(request("Dune", vec![(a.id, "Paul"), (b.id, "Leto")]))
        .await
        .unwrap();

    // Same membership, reversed order: positions must follow the new order
    let detail = h
        .service
        .update_movie(
            &summary.id,
            request("Dune", vec![(b.id, "Leto"), (a.id, "Paul")]),
        )
        .await
        .unwrap();

    assert_eq!(detail.cast[0].actor_id, b.id);
    assert_eq!(detail.cast[0].position, 0);
    assert_eq!(detail.cast[1].actor_id, a.id);
    assert_eq!(detail.cast[1].position, 1);

    let stored = h.movies.stored(&summary.id).unwrap();
    let positions: Vec<i32> = stored.cast.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[tokio::test]
async fn duplicate_actor_selection_collapses_to_first_occurrence() {
    let h = Harness::new();
    let a = h.actors.seed("A");
    let b = h.actors.seed("B");

    let summary = h
        .service
        .create_movie(request(
            "Dune",
            vec![(a.id, "Paul"), (b.id, "Leto"), (a.id, "Paul again")],
        ))
        .await
        .unwrap();

    let stored = h.movies.stored(&summary.id).unwrap();
    assert_eq!(stored.cast.len(), 2);
    assert_eq!(stored.cast[0].character_name, "Paul");
    let positions: Vec<i32> = stored.cast.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[tokio::test]
async fn unknown_actor_id_is_a_validation_failure_with_no_write() {
    let h = Harness::new();
    let ghost = Uuid::new_v4();

    let err = h
        .service
        .create_movie(request("Dune", vec![(ghost, "Paul")]))
        .await
        .unwrap_err();

    match err {
        AppError::ValidationError(message) => assert!(message.contains(&ghost.to_string())),
        other => panic!("expected validation error, got {:?}", other),
    }

    assert!(h.log.position("movie.insert").is_none());
    assert!(h.log.position("cache.evict:movies").is_none());
}

#[tokio::test]
async fn unknown_genre_and_theater_ids_are_validation_failures() {
    let h = Harness::new();
    let ghost = Uuid::new_v4();

    let mut req = request("Dune", Vec::new());
    req.genre_ids = vec![ghost];
    let err = h.service.create_movie(req).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let mut req = request("Dune", Vec::new());
    req.theater_ids = vec![ghost];
    let err = h.service.create_movie(req).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn empty_title_is_rejected() {
    let h = Harness::new();
    let err = h
        .service
        .create_movie(request("  ", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn edit_without_poster_preserves_the_stored_reference() {
    let h = Harness::new();

    let mut req = request("Dune", Vec::new());
    req.poster = Some(poster("jpg"));
    let summary = h.service.create_movie(req).await.unwrap();

    let original_poster = h.movies.stored(&summary.id).unwrap().poster_url.unwrap();
    assert!(h.assets.is_live(&original_poster));

    h.service
        .update_movie(&summary.id, request("Dune: Part Two", Vec::new()))
        .await
        .unwrap();

    let stored = h.movies.stored(&summary.id).unwrap();
    assert_eq!(stored.title, "Dune: Part Two");
    assert_eq!(stored.poster_url.as_deref(), Some(original_poster.as_str()));
    assert!(h.assets.is_live(&original_poster));
}

#[tokio::test]
async fn edit_with_poster_replaces_it_and_kills_the_old_reference() {
    let h = Harness::new();

    let mut req = request("Dune", Vec::new());
    req.poster = Some(poster("jpg"));
    let summary = h.service.create_movie(req).await.unwrap();
    let old_poster = h.movies.stored(&summary.id).unwrap().poster_url.unwrap();

    let mut req = request("Dune", Vec::new());
    req.poster = Some(poster("png"));
    let detail = h.service.update_movie(&summary.id, req).await.unwrap();

    let new_poster = detail.poster_url.unwrap();
    assert_ne!(old_poster, new_poster);
    assert!(!h.assets.is_live(&old_poster));
    assert!(h.assets.is_live(&new_poster));
}

#[tokio::test]
async fn uppercase_poster_extension_is_rejected() {
    let h = Harness::new();

    let mut req = request("Dune", Vec::new());
    req.poster = Some(poster("JPG"));
    let err = h.service.create_movie(req).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(h.log.position("movie.insert").is_none());
}

#[tokio::test]
async fn get_movie_with_unknown_id_is_not_found() {
    let h = Harness::new();
    let err = h.service.get_movie(&Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_and_delete_with_unknown_id_are_not_found() {
    let h = Harness::new();
    let ghost = Uuid::new_v4();

    let err = h
        .service
        .update_movie(&ghost, request("Dune", Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = h.service.delete_movie(&ghost).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_the_aggregate_and_its_poster() {
    let h = Harness::new();
    let a = h.actors.seed("A");
    let g = h.genres.seed("Sci-Fi");
    let t = h.theaters.seed("Cinema One");

    let mut req = request("Dune", vec![(a.id, "Paul")]);
    req.genre_ids = vec![g.id];
    req.theater_ids = vec![t.id];
    req.poster = Some(poster("jpg"));
    let summary = h.service.create_movie(req).await.unwrap();
    let poster_url = h.movies.stored(&summary.id).unwrap().poster_url.unwrap();

    h.service.delete_movie(&summary.id).await.unwrap();

    assert!(h.movies.stored(&summary.id).is_none());
    assert!(!h.assets.is_live(&poster_url));

    let err = h.service.delete_movie(&summary.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ============= ASSET STORE FAILURE PATHS =============

/// Asset store that records its calls and fails on demand, for exercising
/// the abort-before-persistence path.
#[derive(Default)]
struct FailingStore {
    fail_store: bool,
    fail_replace: bool,
    calls: Mutex<Vec<String>>,
}

impl FailingStore {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for FailingStore {
    async fn store(&self, container: &str, _upload: &AssetUpload) -> AppResult<String> {
        self.calls.lock().unwrap().push(format!("store:{}", container));
        if self.fail_store {
            return Err(AppError::AssetStoreError("disk full".to_string()));
        }
        Ok(format!("/assets/{}/0.jpg", container))
    }

    async fn replace(
        &self,
        existing: Option<&str>,
        container: &str,
        _upload: &AssetUpload,
    ) -> AppResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("replace:{}", existing.unwrap_or("-")));
        if self.fail_replace {
            return Err(AppError::AssetStoreError("disk full".to_string()));
        }
        Ok(format!("/assets/{}/1.jpg", container))
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        self.calls.lock().unwrap().push(format!("delete:{}", url));
        Ok(())
    }
}

#[tokio::test]
async fn asset_store_failure_aborts_the_create_before_persistence() {
    let store = Arc::new(FailingStore {
        fail_store: true,
        ..Default::default()
    });
    let h = Harness::with_asset_store(store.clone());

    let mut req = request("Dune", Vec::new());
    req.poster = Some(poster("jpg"));
    let err = h.service.create_movie(req).await.unwrap_err();

    assert!(matches!(err, AppError::AssetStoreError(_)));
    assert_eq!(store.calls(), vec!["store:movies"]);
    assert!(h.log.position("movie.insert").is_none());
    assert!(h.log.position("cache.evict:movies").is_none());
}

#[tokio::test]
async fn asset_store_failure_aborts_the_edit_before_persistence() {
    let store = Arc::new(FailingStore {
        fail_replace: true,
        ..Default::default()
    });
    let h = Harness::with_asset_store(store.clone());

    let mut req = request("Dune", Vec::new());
    req.poster = Some(poster("jpg"));
    let summary = h.service.create_movie(req).await.unwrap();

    let mut req = request("Dune again", Vec::new());
    req.poster = Some(poster("png"));
    let err = h.service.update_movie(&summary.id, req).await.unwrap_err();
    assert!(matches!(err, AppError::AssetStoreError(_)));

    // Replace was handed the stored reference, and the failed edit must
    // leave the aggregate untouched
    assert_eq!(
        store.calls(),
        vec!["store:movies", "replace:/assets/movies/0.jpg"]
    );
    let stored = h.movies.stored(&summary.id).unwrap();
    assert_eq!(stored.title, "Dune");
    assert!(h.log.position("movie.update").is_none());
}

#[tokio::test]
async fn writes_without_posters_never_touch_the_asset_store() {
    let store = Arc::new(FailingStore::default());
    let h = Harness::with_asset_store(store.clone());

    let summary = h
        .service
        .create_movie(request("Dune", Vec::new()))
        .await
        .unwrap();
    h.service
        .update_movie(&summary.id, request("Dune II", Vec::new()))
        .await
        .unwrap();

    assert!(store.calls().is_empty());
}
