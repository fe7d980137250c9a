//! List-scoped endpoints: get-or-create, view, add, batch reorder, randomize

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::ranking::{RankingList, RankingView, RepositionEntry};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub owner_id: String,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub album_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub item_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub entries: Vec<RepositionEntry>,
}

/// POST /api/lists
///
/// Idempotent: returns the existing list for the owner/year pair if any.
pub async fn get_or_create_list(
    State(state): State<AppState>,
    Json(request): Json<ListRequest>,
) -> ApiResult<Json<RankingList>> {
    let owner_id = request.owner_id.trim();
    if owner_id.is_empty() {
        return Err(ApiError::BadRequest("owner_id must not be empty".to_string()));
    }

    let list = state.engine.get_or_create_list(owner_id, request.year).await?;
    Ok(Json(list))
}

/// GET /api/lists/:list_id/items
pub async fn get_list_view(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<Json<RankingView>> {
    Ok(Json(state.engine.list_view(list_id).await?))
}

/// POST /api/lists/:list_id/items
pub async fn add_item(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<(StatusCode, Json<AddItemResponse>)> {
    let item_id = state.engine.add_item(list_id, request.album_id).await?;
    Ok((StatusCode::CREATED, Json(AddItemResponse { item_id })))
}

/// POST /api/lists/:list_id/reorder
///
/// All-or-nothing: one invalid entry rejects the whole batch.
pub async fn batch_reposition(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> ApiResult<StatusCode> {
    state
        .engine
        .batch_reposition(list_id, &request.entries)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/lists/:list_id/randomize
pub async fn randomize(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.engine.randomize(list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
