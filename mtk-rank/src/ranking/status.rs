//! Item status transitions
//!
//! Any status may follow any other, including confirmed back to none or
//! locked. Position never changes here.

use mtk_common::time;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::store;
use super::types::ItemStatus;
use crate::error::{RankError, Result};

/// Set an item's status
pub async fn set_status(db: &SqlitePool, item_id: Uuid, status: ItemStatus) -> Result<()> {
    let mut conn = db.acquire().await?;

    let touched = store::set_status(&mut *conn, item_id, status, time::now()).await?;
    if touched == 0 {
        return Err(RankError::NotFound(item_id));
    }

    info!(item_id = %item_id, status = %status, "Item status changed");
    Ok(())
}
