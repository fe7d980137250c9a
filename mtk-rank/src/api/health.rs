//! Health check and client configuration endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// Settings a ranking client needs to mirror server behavior
#[derive(Debug, Serialize)]
pub struct ClientConfigResponse {
    pub debounce_ms: u64,
    pub max_items: usize,
    pub bucket_width: u32,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "mtk-rank".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/client-config
pub async fn client_config(State(state): State<AppState>) -> Json<ClientConfigResponse> {
    Json(ClientConfigResponse {
        debounce_ms: state.debounce_ms,
        max_items: crate::ranking::MAX_ITEMS_PER_LIST,
        bucket_width: crate::ranking::BUCKET_WIDTH,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
