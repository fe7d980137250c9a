//! Item-scoped endpoints: remove, move, status

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::ranking::ItemStatus;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub position: u32,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ItemStatus,
}

/// DELETE /api/items/:item_id
///
/// Succeeds even if the item is already gone.
pub async fn remove_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.engine.remove_item(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/items/:item_id/move
pub async fn move_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<StatusCode> {
    state.engine.move_item(item_id, request.position).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/items/:item_id/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> ApiResult<StatusCode> {
    state.engine.set_status(item_id, request.status).await?;
    Ok(StatusCode::NO_CONTENT)
}
