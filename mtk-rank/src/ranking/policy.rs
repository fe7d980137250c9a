//! Move constraint policy
//!
//! The single place where item status decides whether a position change is
//! allowed. Both the single-item mover and the batch repositioner consult it,
//! as does the client-side debouncer before applying a local move.

use super::position::{bucket_of, same_bucket};
use super::types::{ItemStatus, RankedItem};
use crate::error::{RankError, Result};

/// Decide whether `item` may move from `from` to `to`
///
/// `target` is the item currently at `to`, if any. Checks, in order:
/// 1. a confirmed item never changes position
/// 2. a confirmed target is never displaced
/// 3. a locked item stays inside its bucket
pub fn can_move(item: &RankedItem, from: u32, to: u32, target: Option<&RankedItem>) -> Result<()> {
    check_confirmed(item, from, to)?;
    if let Some(target) = target {
        check_target(target, to)?;
    }
    check_bucket(item, from, to)
}

/// Validate one batch entry: a confirmed item must keep its position
///
/// Same confirmed-item rule as [`can_move`], reported as `ConfirmedMoved`.
/// Batches carry a whole ordering, so targets and buckets are not checked.
pub fn check_batch_entry(item: &RankedItem, to: u32) -> Result<()> {
    check_confirmed(item, item.position, to).map_err(|_| RankError::ConfirmedMoved {
        item_id: item.id,
        from: item.position,
        to,
    })
}

fn check_confirmed(item: &RankedItem, from: u32, to: u32) -> Result<()> {
    match item.status {
        ItemStatus::Confirmed if to != from => Err(RankError::ConfirmedImmutable(item.id)),
        ItemStatus::None | ItemStatus::Locked | ItemStatus::Confirmed => Ok(()),
    }
}

fn check_target(target: &RankedItem, to: u32) -> Result<()> {
    match target.status {
        ItemStatus::Confirmed => Err(RankError::TargetConfirmed {
            target_id: target.id,
            position: to,
        }),
        ItemStatus::None | ItemStatus::Locked => Ok(()),
    }
}

fn check_bucket(item: &RankedItem, from: u32, to: u32) -> Result<()> {
    match item.status {
        ItemStatus::Locked if !same_bucket(from, to) => Err(RankError::BucketViolation {
            item_id: item.id,
            to,
            from_bucket: bucket_of(from),
            to_bucket: bucket_of(to),
        }),
        ItemStatus::None | ItemStatus::Locked | ItemStatus::Confirmed => Ok(()),
    }
}
