//! Ranking domain types

use chrono::{DateTime, Utc};
use mtk_common::db::{RankedItemRow, RankingListRow};
use mtk_common::uuid_utils::parse_column;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::RankError;

/// Maximum number of ranked items in one list
pub const MAX_ITEMS_PER_LIST: usize = 50;

/// Width of a position bucket; locked items stay inside theirs
pub const BUCKET_WIDTH: u32 = 10;

/// Item status
///
/// - `None`: free to move anywhere
/// - `Locked`: may only move within its current bucket
/// - `Confirmed`: position is frozen for move and batch operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    None,
    Locked,
    Confirmed,
}

impl ItemStatus {
    /// Database / wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::None => "none",
            ItemStatus::Locked => "locked",
            ItemStatus::Confirmed => "confirmed",
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == ItemStatus::Confirmed
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ItemStatus::None),
            "locked" => Ok(ItemStatus::Locked),
            "confirmed" => Ok(ItemStatus::Confirmed),
            other => Err(RankError::InvalidStatus(other.to_string())),
        }
    }
}

/// One ranking scope: a single owner's ranking for a single year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingList {
    pub id: Uuid,
    pub owner_id: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RankingListRow> for RankingList {
    type Error = RankError;

    fn try_from(row: RankingListRow) -> Result<Self, Self::Error> {
        let year = i32::try_from(row.year).map_err(|_| {
            mtk_common::Error::Internal(format!("Year out of range in list {}: {}", row.guid, row.year))
        })?;

        Ok(RankingList {
            id: parse_column("ranking_lists.guid", &row.guid)?,
            owner_id: row.owner_id,
            year,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// One entry in a ranking list
///
/// `album_id` is a lookup key into the album catalog, never an owning link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub album_id: Uuid,
    /// 1-based rank
    pub position: u32,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RankedItemRow> for RankedItem {
    type Error = RankError;

    fn try_from(row: RankedItemRow) -> Result<Self, Self::Error> {
        let position = u32::try_from(row.position).map_err(|_| {
            mtk_common::Error::Internal(format!(
                "Position out of range for item {}: {}",
                row.guid, row.position
            ))
        })?;

        Ok(RankedItem {
            id: parse_column("ranked_items.guid", &row.guid)?,
            list_id: parse_column("ranked_items.list_id", &row.list_id)?,
            album_id: parse_column("ranked_items.album_id", &row.album_id)?,
            position,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// One `{item, position}` pair of a batch reposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositionEntry {
    pub item_id: Uuid,
    pub position: u32,
}
