//! All-or-nothing batch reposition
//!
//! Every entry is validated before anything is written; one bad entry rejects
//! the whole call. The submitted positions are trusted to form a full
//! permutation: a gap or duplicate is logged, not refused.

use std::collections::HashMap;

use mtk_common::time;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use super::policy;
use super::position;
use super::store;
use super::types::{RankedItem, RepositionEntry};
use crate::error::{RankError, Result};

/// Apply a set of `{item, position}` writes to one list atomically
pub async fn batch_reposition(
    db: &SqlitePool,
    list_id: Uuid,
    entries: &[RepositionEntry],
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let mut tx = db.begin().await?;

    let current: HashMap<Uuid, RankedItem> = store::fetch_items(&mut *tx, list_id)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mut writes: Vec<(Uuid, u32)> = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.position == 0 {
            return Err(RankError::InvalidPosition {
                position: 0,
                reason: "positions start at 1".to_string(),
            });
        }

        let item = match current.get(&entry.item_id) {
            Some(item) => item,
            None => {
                return Err(match store::fetch_item(&mut *tx, entry.item_id).await? {
                    Some(other) => RankError::WrongList {
                        item_id: entry.item_id,
                        expected: list_id,
                        actual: other.list_id,
                    },
                    None => RankError::NotFound(entry.item_id),
                });
            }
        };

        policy::check_batch_entry(item, entry.position)?;

        if item.position != entry.position {
            writes.push((item.id, entry.position));
        }
    }

    let mut resulting: HashMap<Uuid, u32> =
        current.values().map(|item| (item.id, item.position)).collect();
    for (item_id, new_position) in &writes {
        resulting.insert(*item_id, *new_position);
    }
    if !position::is_contiguous_permutation(resulting.values().copied()) {
        warn!(
            list_id = %list_id,
            entries = entries.len(),
            "Batch reposition leaves list positions non-contiguous"
        );
    }

    let now = time::now();
    for (item_id, new_position) in &writes {
        store::set_position(&mut *tx, *item_id, *new_position, now).await?;
    }
    if !writes.is_empty() {
        store::touch_list(&mut *tx, list_id, now).await?;
    }
    tx.commit().await?;

    info!(
        list_id = %list_id,
        entries = entries.len(),
        changed = writes.len(),
        "Batch reposition applied"
    );

    Ok(())
}
