//! mtk-rank library - Album ranking service
//!
//! Ranked-list engine for per-owner, per-year album rankings plus the HTTP
//! API that exposes it. See [`ranking`] for the ordering rules.

use axum::Router;
use mtk_common::config::RankingConfig;
use mtk_common::db::settings;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod catalog;
pub mod debounce;
pub mod error;
pub mod ranking;

pub use error::{ApiError, RankError};
pub use ranking::RankingEngine;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Ranking engine (owns the database pool)
    pub engine: RankingEngine,
    /// Quiet period advertised to clients that debounce their reorders
    pub debounce_ms: u64,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: RankingEngine, debounce_ms: u64) -> Self {
        Self {
            engine,
            debounce_ms,
        }
    }
}

/// Debounce quiet period to advertise to clients
///
/// The `settings` table is authoritative (a new database is seeded from the
/// bootstrap config); the bootstrap value is used only when the stored value
/// cannot be read.
pub async fn load_debounce_ms(db: &SqlitePool, ranking: &RankingConfig) -> u64 {
    match settings::get_ranking_debounce_ms(db).await {
        Ok(ms) => ms,
        Err(e) => {
            warn!(
                "Invalid ranking debounce setting ({}), using config value {}ms",
                e, ranking.debounce_ms
            );
            ranking.debounce_ms
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post, put};

    let api = Router::new()
        .route("/api/client-config", get(api::client_config))
        .route("/api/lists", post(api::get_or_create_list))
        .route(
            "/api/lists/:list_id/items",
            get(api::get_list_view).post(api::add_item),
        )
        .route("/api/lists/:list_id/reorder", post(api::batch_reposition))
        .route("/api/lists/:list_id/randomize", post(api::randomize))
        .route("/api/items/:item_id", delete(api::remove_item))
        .route("/api/items/:item_id/move", post(api::move_item))
        .route("/api/items/:item_id/status", put(api::set_status))
        .route("/api/albums/:album_id", get(api::get_album).put(api::upsert_album));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
