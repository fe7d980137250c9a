//! Single-item moves
//!
//! A move is a swap: the item takes the target position and whatever item
//! held that position takes the vacated one. At most two rows change.

use mtk_common::time;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::policy;
use super::store;
use crate::error::{RankError, Result};

/// Move an item to `new_position` by swapping with the current occupant
///
/// Status rules are checked before the range, so a confirmed item reports
/// `ConfirmedImmutable` wherever it is sent.
pub async fn move_item(db: &SqlitePool, item_id: Uuid, new_position: u32) -> Result<()> {
    let mut tx = db.begin().await?;

    let item = store::fetch_item(&mut *tx, item_id)
        .await?
        .ok_or(RankError::NotFound(item_id))?;
    let old_position = item.position;

    if new_position == old_position {
        debug!(item_id = %item_id, position = new_position, "Move to current position ignored");
        return Ok(());
    }

    let target = store::fetch_item_at(&mut *tx, item.list_id, new_position).await?;
    if let Err(e) = policy::can_move(&item, old_position, new_position, target.as_ref()) {
        debug!(item_id = %item_id, from = old_position, to = new_position, "Move rejected: {}", e);
        return Err(e);
    }

    if new_position == 0 {
        return Err(RankError::InvalidPosition {
            position: new_position,
            reason: "positions start at 1".to_string(),
        });
    }
    let count = store::count_items(&mut *tx, item.list_id).await?;
    if new_position as usize > count {
        return Err(RankError::InvalidPosition {
            position: new_position,
            reason: format!("list has {} items", count),
        });
    }

    let now = time::now();
    store::set_position(&mut *tx, item.id, new_position, now).await?;
    // No occupant only happens after a batch left a hole; fill it directly
    if let Some(target) = &target {
        store::set_position(&mut *tx, target.id, old_position, now).await?;
    }
    store::touch_list(&mut *tx, item.list_id, now).await?;
    tx.commit().await?;

    info!(
        item_id = %item_id,
        from = old_position,
        to = new_position,
        swapped_with = ?target.as_ref().map(|t| t.id),
        "Moved item"
    );

    Ok(())
}
