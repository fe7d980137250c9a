//! Constrained shuffle
//!
//! Confirmed items keep their positions. Every other item draws a position
//! from the remaining slots via an unbiased Fisher-Yates shuffle and has its
//! status reset to none.

use std::collections::HashSet;

use mtk_common::time;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::position;
use super::store;
use super::types::{ItemStatus, RankedItem};
use crate::error::Result;

/// Plan new positions for every non-confirmed item
///
/// Shuffled slots are handed out in the order `items` is given. Returns
/// `(item_id, new_position)` pairs; confirmed items are absent.
pub fn plan_shuffle<R: Rng + ?Sized>(items: &[RankedItem], rng: &mut R) -> Vec<(Uuid, u32)> {
    let (confirmed, movable): (Vec<&RankedItem>, Vec<&RankedItem>) =
        items.iter().partition(|item| item.status.is_confirmed());

    let pinned: HashSet<u32> = confirmed.iter().map(|item| item.position).collect();
    let mut available = position::available_positions(items.len(), &pinned);
    available.shuffle(rng);

    movable
        .iter()
        .zip(available)
        .map(|(item, slot)| (item.id, slot))
        .collect()
}

/// Shuffle a list using a fresh entropy-seeded generator
pub async fn randomize(db: &SqlitePool, list_id: Uuid) -> Result<()> {
    let mut rng = StdRng::from_entropy();
    randomize_with_rng(db, list_id, &mut rng).await
}

/// Shuffle a list with a caller-supplied generator
pub async fn randomize_with_rng<R>(db: &SqlitePool, list_id: Uuid, rng: &mut R) -> Result<()>
where
    R: Rng + Send + ?Sized,
{
    let mut tx = db.begin().await?;

    let items = store::fetch_items(&mut *tx, list_id).await?;
    let plan = plan_shuffle(&items, rng);

    let now = time::now();
    for (item_id, new_position) in &plan {
        store::set_position_and_status(&mut *tx, *item_id, *new_position, ItemStatus::None, now)
            .await?;
    }
    if !plan.is_empty() {
        store::touch_list(&mut *tx, list_id, now).await?;
    }
    tx.commit().await?;

    info!(
        list_id = %list_id,
        shuffled = plan.len(),
        pinned = items.len() - plan.len(),
        "Randomized ranking"
    );

    Ok(())
}
