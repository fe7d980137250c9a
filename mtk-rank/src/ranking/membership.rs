//! List membership: get-or-create lists, add and remove items
//!
//! Removal closes the gap it leaves inside the same transaction, so no reader
//! ever observes a list with a hole in its positions.

use mtk_common::{time, uuid_utils};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::position;
use super::store;
use super::types::{ItemStatus, RankedItem, RankingList, MAX_ITEMS_PER_LIST};
use crate::error::{RankError, Result};

/// Return the list for `owner_id`/`year`, creating it on first use
pub async fn get_or_create_list(db: &SqlitePool, owner_id: &str, year: i32) -> Result<RankingList> {
    let mut tx = db.begin().await?;

    if let Some(list) = store::find_list(&mut *tx, owner_id, year).await? {
        return Ok(list);
    }

    let now = time::now();
    let candidate = RankingList {
        id: uuid_utils::generate(),
        owner_id: owner_id.to_string(),
        year,
        created_at: now,
        updated_at: now,
    };

    // INSERT OR IGNORE: a concurrent creator may have won the race
    let created = store::insert_list(&mut *tx, &candidate).await?;
    let list = store::find_list(&mut *tx, owner_id, year)
        .await?
        .ok_or_else(|| mtk_common::Error::Internal(format!("List for {}/{} vanished", owner_id, year)))?;
    tx.commit().await?;

    if created {
        info!(list_id = %list.id, owner_id, year, "Created ranking list");
    }

    Ok(list)
}

/// Append an album to the end of a list
///
/// The new item takes position `count + 1` with status none.
pub async fn add_item(db: &SqlitePool, list_id: Uuid, album_id: Uuid) -> Result<Uuid> {
    let mut tx = db.begin().await?;

    if store::fetch_list(&mut *tx, list_id).await?.is_none() {
        return Err(RankError::ListNotFound(list_id));
    }

    let count = store::count_items(&mut *tx, list_id).await?;
    if count >= MAX_ITEMS_PER_LIST {
        return Err(RankError::ListFull {
            list_id,
            max: MAX_ITEMS_PER_LIST,
        });
    }

    if store::album_in_list(&mut *tx, list_id, album_id).await? {
        return Err(RankError::AlreadyExists { list_id, album_id });
    }

    let now = time::now();
    let item = RankedItem {
        id: uuid_utils::generate(),
        list_id,
        album_id,
        position: count as u32 + 1,
        status: ItemStatus::None,
        created_at: now,
        updated_at: now,
    };

    store::insert_item(&mut *tx, &item).await?;
    store::touch_list(&mut *tx, list_id, now).await?;
    tx.commit().await?;

    info!(
        list_id = %list_id,
        item_id = %item.id,
        album_id = %album_id,
        position = item.position,
        "Added item to ranking"
    );

    Ok(item.id)
}

/// Remove an item and shift every later item up by one
///
/// Removing an item that does not exist is a silent no-op.
pub async fn remove_item(db: &SqlitePool, item_id: Uuid) -> Result<()> {
    let mut tx = db.begin().await?;

    let Some(removed) = store::fetch_item(&mut *tx, item_id).await? else {
        debug!(item_id = %item_id, "Remove of unknown item ignored");
        return Ok(());
    };

    store::delete_item(&mut *tx, item_id).await?;

    let remaining = store::fetch_items(&mut *tx, removed.list_id).await?;
    let (mut above, below): (Vec<RankedItem>, Vec<RankedItem>) = remaining
        .into_iter()
        .partition(|item| item.position > removed.position);

    position::shift_down(&mut above);

    let now = time::now();
    for item in &above {
        store::set_position(&mut *tx, item.id, item.position, now).await?;
    }
    store::touch_list(&mut *tx, removed.list_id, now).await?;
    tx.commit().await?;

    if !position::is_contiguous_permutation(below.iter().chain(&above).map(|i| i.position)) {
        warn!(list_id = %removed.list_id, "List positions not contiguous after removal");
    }

    info!(
        list_id = %removed.list_id,
        item_id = %item_id,
        position = removed.position,
        shifted = above.len(),
        "Removed item from ranking"
    );

    Ok(())
}

/// Items of a list, ordered by position
pub async fn list_items(db: &SqlitePool, list_id: Uuid) -> Result<Vec<RankedItem>> {
    let mut conn = db.acquire().await?;
    store::fetch_items(&mut *conn, list_id).await
}
