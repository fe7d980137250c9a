//! Database row models
//!
//! Rows mirror the SQLite columns one-to-one. Identifiers are hyphenated
//! UUID text; services convert rows into their own domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Setting {
    pub key: String,
    pub value: Option<String>,
}

/// One ranking scope (owner + year)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RankingListRow {
    pub guid: String,
    pub owner_id: String,
    pub year: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of a ranking list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RankedItemRow {
    pub guid: String,
    pub list_id: String,
    pub album_id: String,
    pub position: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Album catalog metadata (display only)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlbumRow {
    pub guid: String,
    pub title: String,
    pub artist: String,
    pub release_year: Option<i64>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
