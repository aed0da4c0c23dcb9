use chrono::Utc;

use super::dto::MovieWriteRequest;
use crate::modules::catalog::domain::{Genre, Theater};
use crate::modules::movies::domain::services::cast_order;
use crate::modules::movies::domain::{CastMember, Movie};

/// Selections from a write request resolved against the persistence context:
/// cast in the client-submitted order, plus the referenced genres and theaters.
/// The service builds this after referential validation, so the assembler
/// works over known-good data.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSelections {
    pub cast: Vec<CastMember>,
    pub genres: Vec<Genre>,
    pub theaters: Vec<Theater>,
}

/// Build a fresh movie aggregate from a creation payload.
pub fn assemble_new(
    request: &MovieWriteRequest,
    poster_url: Option<String>,
    selections: ResolvedSelections,
) -> Movie {
    let mut movie = Movie::new(request.title.clone(), request.release_date);
    movie.trailer = request.trailer.clone();
    movie.poster_url = poster_url;
    movie.cast = selections.cast;
    movie.genres = selections.genres;
    movie.theaters = selections.theaters;

    cast_order::assign_positions(&mut movie.cast);
    movie
}

/// Overlay an edit payload onto the persisted aggregate: scalars overwritten
/// unconditionally, link collections replaced wholesale. `new_poster_url` is
/// `None` when no poster was uploaded, which keeps the stored reference.
pub fn overlay(
    mut existing: Movie,
    request: &MovieWriteRequest,
    new_poster_url: Option<String>,
    selections: ResolvedSelections,
) -> Movie {
    existing.title = request.title.clone();
    existing.release_date = request.release_date;
    existing.trailer = request.trailer.clone();
    if let Some(url) = new_poster_url {
        existing.poster_url = Some(url);
    }
    existing.cast = selections.cast;
    existing.genres = selections.genres;
    existing.theaters = selections.theaters;
    existing.updated_at = Utc::now();

    // Always re-run, even when the membership did not change: positions track
    // the submitted order, not whatever was stored before.
    cast_order::assign_positions(&mut existing.cast);
    existing
}
