//! Error types for mtk-rank
//!
//! Two families of failure reach callers:
//! - **Validation errors**: the request did not match current state
//!   (unknown list or item, full list, duplicate album, item from another
//!   list, out-of-range position). Re-fetch and retry with corrected input.
//! - **Constraint violations**: the transition is disallowed by item status.
//!   Retrying the same request can never succeed.
//!
//! Every failure is returned before any write is committed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Ranking engine error type
#[derive(Debug, Error)]
pub enum RankError {
    /// Ranking list does not exist
    #[error("Ranking list not found: {0}")]
    ListNotFound(Uuid),

    /// Ranked item does not exist
    #[error("Ranked item not found: {0}")]
    NotFound(Uuid),

    /// List already holds the maximum number of items
    #[error("Ranking list {list_id} is full ({max} items)")]
    ListFull { list_id: Uuid, max: usize },

    /// Album is already a member of the list
    #[error("Album {album_id} is already ranked in list {list_id}")]
    AlreadyExists { list_id: Uuid, album_id: Uuid },

    /// Item referenced in a batch belongs to a different list
    #[error("Ranked item {item_id} belongs to list {actual}, not {expected}")]
    WrongList {
        item_id: Uuid,
        expected: Uuid,
        actual: Uuid,
    },

    /// Position outside the list's 1-based range
    #[error("Invalid position {position}: {reason}")]
    InvalidPosition { position: u32, reason: String },

    /// Status string is not one of none/locked/confirmed
    #[error("Unknown item status: {0}")]
    InvalidStatus(String),

    /// Confirmed item asked to move
    #[error("Ranked item {0} is confirmed and cannot move")]
    ConfirmedImmutable(Uuid),

    /// Move target is held by a confirmed item
    #[error("Position {position} is held by confirmed item {target_id}")]
    TargetConfirmed { target_id: Uuid, position: u32 },

    /// Locked item asked to leave its bucket
    #[error(
        "Locked item {item_id} cannot leave bucket {from_bucket} (position {to} is in bucket {to_bucket})"
    )]
    BucketViolation {
        item_id: Uuid,
        to: u32,
        from_bucket: u32,
        to_bucket: u32,
    },

    /// Batch entry would move a confirmed item; the whole batch is rejected
    #[error("Batch would move confirmed item {item_id} from position {from} to {to}")]
    ConfirmedMoved { item_id: Uuid, from: u32, to: u32 },

    /// Database operation error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// mtk-common error (corrupt row, settings, config)
    #[error(transparent)]
    Common(#[from] mtk_common::Error),
}

impl RankError {
    /// True for status-driven rejections that no retry can fix
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            RankError::ConfirmedImmutable(_)
                | RankError::TargetConfirmed { .. }
                | RankError::BucketViolation { .. }
                | RankError::ConfirmedMoved { .. }
        )
    }

    /// Stable machine-readable code used in API responses
    pub fn code(&self) -> &'static str {
        match self {
            RankError::ListNotFound(_) => "LIST_NOT_FOUND",
            RankError::NotFound(_) => "NOT_FOUND",
            RankError::ListFull { .. } => "LIST_FULL",
            RankError::AlreadyExists { .. } => "ALREADY_EXISTS",
            RankError::WrongList { .. } => "WRONG_LIST",
            RankError::InvalidPosition { .. } => "INVALID_POSITION",
            RankError::InvalidStatus(_) => "INVALID_STATUS",
            RankError::ConfirmedImmutable(_) => "CONFIRMED_IMMUTABLE",
            RankError::TargetConfirmed { .. } => "TARGET_CONFIRMED",
            RankError::BucketViolation { .. } => "BUCKET_VIOLATION",
            RankError::ConfirmedMoved { .. } => "CONFIRMED_MOVED",
            RankError::Database(_) => "DATABASE_ERROR",
            RankError::Common(_) => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            RankError::ListNotFound(_) | RankError::NotFound(_) => StatusCode::NOT_FOUND,
            RankError::WrongList { .. }
            | RankError::InvalidPosition { .. }
            | RankError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            RankError::ListFull { .. } | RankError::AlreadyExists { .. } => StatusCode::CONFLICT,
            e if e.is_constraint_violation() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convenience Result type using the ranking error
pub type Result<T> = std::result::Result<T, RankError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Engine rejected the request
    #[error(transparent)]
    Rank(#[from] RankError),

    /// Catalog resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request that never reached the engine
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<mtk_common::Error> for ApiError {
    fn from(err: mtk_common::Error) -> Self {
        ApiError::Rank(RankError::Common(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Rank(err) => (err.status_code(), err.code(), err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, "Request failed: {}", message);
        } else {
            tracing::debug!(code = error_code, "Request rejected: {}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;
