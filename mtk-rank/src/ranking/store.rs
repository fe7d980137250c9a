//! Ranking table access
//!
//! Thin query layer over `ranking_lists` and `ranked_items`. Every function
//! takes a connection rather than the pool so callers can run several of them
//! inside one transaction (`&mut *tx`).

use chrono::{DateTime, Utc};
use mtk_common::db::{RankedItemRow, RankingListRow};
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::types::{ItemStatus, RankedItem, RankingList};
use crate::error::Result;

const ITEM_COLUMNS: &str = "guid, list_id, album_id, position, status, created_at, updated_at";

/// Get a list by ID
pub async fn fetch_list(conn: &mut SqliteConnection, list_id: Uuid) -> Result<Option<RankingList>> {
    let row = sqlx::query_as::<_, RankingListRow>(
        "SELECT guid, owner_id, year, created_at, updated_at FROM ranking_lists WHERE guid = ?",
    )
    .bind(list_id.to_string())
    .fetch_optional(&mut *conn)
    .await?;

    row.map(RankingList::try_from).transpose()
}

/// Get the list for an owner/year pair
pub async fn find_list(
    conn: &mut SqliteConnection,
    owner_id: &str,
    year: i32,
) -> Result<Option<RankingList>> {
    let row = sqlx::query_as::<_, RankingListRow>(
        r#"
        SELECT guid, owner_id, year, created_at, updated_at
        FROM ranking_lists
        WHERE owner_id = ? AND year = ?
        "#,
    )
    .bind(owner_id)
    .bind(year)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(RankingList::try_from).transpose()
}

/// Insert a list, ignoring the insert if the owner/year pair already exists
///
/// Returns true when a row was written.
pub async fn insert_list(conn: &mut SqliteConnection, list: &RankingList) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO ranking_lists (guid, owner_id, year, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(list.id.to_string())
    .bind(&list.owner_id)
    .bind(list.year)
    .bind(list.created_at)
    .bind(list.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Bump a list's `updated_at`
pub async fn touch_list(conn: &mut SqliteConnection, list_id: Uuid, now: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE ranking_lists SET updated_at = ? WHERE guid = ?")
        .bind(now)
        .bind(list_id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Get a ranked item by ID
pub async fn fetch_item(conn: &mut SqliteConnection, item_id: Uuid) -> Result<Option<RankedItem>> {
    let row = sqlx::query_as::<_, RankedItemRow>(&format!(
        "SELECT {} FROM ranked_items WHERE guid = ?",
        ITEM_COLUMNS
    ))
    .bind(item_id.to_string())
    .fetch_optional(&mut *conn)
    .await?;

    row.map(RankedItem::try_from).transpose()
}

/// All items of a list, ordered by position
pub async fn fetch_items(conn: &mut SqliteConnection, list_id: Uuid) -> Result<Vec<RankedItem>> {
    let rows = sqlx::query_as::<_, RankedItemRow>(&format!(
        "SELECT {} FROM ranked_items WHERE list_id = ? ORDER BY position ASC, created_at ASC",
        ITEM_COLUMNS
    ))
    .bind(list_id.to_string())
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(RankedItem::try_from).collect()
}

/// The item holding `position` in a list, if any
pub async fn fetch_item_at(
    conn: &mut SqliteConnection,
    list_id: Uuid,
    position: u32,
) -> Result<Option<RankedItem>> {
    let row = sqlx::query_as::<_, RankedItemRow>(&format!(
        "SELECT {} FROM ranked_items WHERE list_id = ? AND position = ? LIMIT 1",
        ITEM_COLUMNS
    ))
    .bind(list_id.to_string())
    .bind(position)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(RankedItem::try_from).transpose()
}

/// Number of items in a list
pub async fn count_items(conn: &mut SqliteConnection, list_id: Uuid) -> Result<usize> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ranked_items WHERE list_id = ?")
        .bind(list_id.to_string())
        .fetch_one(&mut *conn)
        .await?;

    Ok(count.max(0) as usize)
}

/// True if the album is already ranked in the list
pub async fn album_in_list(conn: &mut SqliteConnection, list_id: Uuid, album_id: Uuid) -> Result<bool> {
    let found: Option<String> =
        sqlx::query_scalar("SELECT guid FROM ranked_items WHERE list_id = ? AND album_id = ?")
            .bind(list_id.to_string())
            .bind(album_id.to_string())
            .fetch_optional(&mut *conn)
            .await?;

    Ok(found.is_some())
}

/// Insert a new ranked item
pub async fn insert_item(conn: &mut SqliteConnection, item: &RankedItem) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ranked_items (guid, list_id, album_id, position, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(item.id.to_string())
    .bind(item.list_id.to_string())
    .bind(item.album_id.to_string())
    .bind(item.position)
    .bind(item.status.as_str())
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Set an item's position
pub async fn set_position(
    conn: &mut SqliteConnection,
    item_id: Uuid,
    position: u32,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE ranked_items SET position = ?, updated_at = ? WHERE guid = ?")
        .bind(position)
        .bind(now)
        .bind(item_id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Set an item's status; returns the number of rows touched (0 or 1)
pub async fn set_status(
    conn: &mut SqliteConnection,
    item_id: Uuid,
    status: ItemStatus,
    now: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query("UPDATE ranked_items SET status = ?, updated_at = ? WHERE guid = ?")
        .bind(status.as_str())
        .bind(now)
        .bind(item_id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Set position and status together
pub async fn set_position_and_status(
    conn: &mut SqliteConnection,
    item_id: Uuid,
    position: u32,
    status: ItemStatus,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE ranked_items SET position = ?, status = ?, updated_at = ? WHERE guid = ?")
        .bind(position)
        .bind(status.as_str())
        .bind(now)
        .bind(item_id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Delete an item; returns the number of rows removed (0 or 1)
pub async fn delete_item(conn: &mut SqliteConnection, item_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM ranked_items WHERE guid = ?")
        .bind(item_id.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
