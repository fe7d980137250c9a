//! Album catalog endpoints
//!
//! Catalog entries are normally fed by other services; the PUT endpoint lets
//! them (and tests) seed metadata.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::Album;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AlbumRequest {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// GET /api/albums/:album_id
pub async fn get_album(
    State(state): State<AppState>,
    Path(album_id): Path<Uuid>,
) -> ApiResult<Json<Album>> {
    state
        .engine
        .catalog()
        .get_album(album_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Album not found: {}", album_id)))
}

/// PUT /api/albums/:album_id
pub async fn upsert_album(
    State(state): State<AppState>,
    Path(album_id): Path<Uuid>,
    Json(request): Json<AlbumRequest>,
) -> ApiResult<StatusCode> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let album = Album {
        id: album_id,
        title: request.title,
        artist: request.artist,
        release_year: request.release_year,
        cover_url: request.cover_url,
    };
    state.engine.catalog().upsert_album(&album).await?;
    Ok(StatusCode::NO_CONTENT)
}
