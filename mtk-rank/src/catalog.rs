//! Album catalog
//!
//! Display metadata for albums referenced by ranked items. The ranking engine
//! joins against it only when building read views; ordering never looks here.

use std::collections::HashMap;

use mtk_common::db::AlbumRow;
use mtk_common::time;
use mtk_common::uuid_utils::parse_column;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{RankError, Result};

const ALBUM_COLUMNS: &str = "guid, title, artist, release_year, cover_url, created_at, updated_at";

/// Album metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub release_year: Option<i32>,
    pub cover_url: Option<String>,
}

impl TryFrom<AlbumRow> for Album {
    type Error = RankError;

    fn try_from(row: AlbumRow) -> std::result::Result<Self, Self::Error> {
        Ok(Album {
            id: parse_column("albums.guid", &row.guid)?,
            title: row.title,
            artist: row.artist,
            release_year: row.release_year.and_then(|y| i32::try_from(y).ok()),
            cover_url: row.cover_url,
        })
    }
}

/// Read/write access to the `albums` table
#[derive(Clone)]
pub struct AlbumCatalog {
    db: SqlitePool,
}

impl AlbumCatalog {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert or replace album metadata
    pub async fn upsert_album(&self, album: &Album) -> Result<()> {
        let now = time::now();

        sqlx::query(
            r#"
            INSERT INTO albums (guid, title, artist, release_year, cover_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(guid) DO UPDATE SET
                title = excluded.title,
                artist = excluded.artist,
                release_year = excluded.release_year,
                cover_url = excluded.cover_url,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(album.id.to_string())
        .bind(&album.title)
        .bind(&album.artist)
        .bind(album.release_year)
        .bind(&album.cover_url)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        debug!(album_id = %album.id, title = %album.title, "Upserted album");
        Ok(())
    }

    /// Look up one album
    pub async fn get_album(&self, album_id: Uuid) -> Result<Option<Album>> {
        let row = sqlx::query_as::<_, AlbumRow>(&format!(
            "SELECT {} FROM albums WHERE guid = ?",
            ALBUM_COLUMNS
        ))
        .bind(album_id.to_string())
        .fetch_optional(&self.db)
        .await?;

        row.map(Album::try_from).transpose()
    }

    /// Look up many albums at once; unknown IDs are simply absent
    pub async fn get_albums(&self, album_ids: &[Uuid]) -> Result<HashMap<Uuid, Album>> {
        if album_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM albums WHERE guid IN (", ALBUM_COLUMNS));
        let mut ids = query.separated(", ");
        for id in album_ids {
            ids.push_bind(id.to_string());
        }
        ids.push_unseparated(")");

        let rows = query
            .build_query_as::<AlbumRow>()
            .fetch_all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| Album::try_from(row).map(|album| (album.id, album)))
            .collect()
    }
}
