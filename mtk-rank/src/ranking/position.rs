//! Position arithmetic
//!
//! Pure integer helpers shared by every mutating operation. Positions are
//! 1-based; a healthy list holds exactly `1..=count`.

use std::collections::HashSet;

use super::types::{RankedItem, BUCKET_WIDTH};

/// Bucket index of a position: `ceil(position / 10)`
///
/// Positions 1..=10 are bucket 1, 11..=20 bucket 2, and so on.
pub fn bucket_of(position: u32) -> u32 {
    position.div_ceil(BUCKET_WIDTH)
}

pub fn same_bucket(a: u32, b: u32) -> bool {
    bucket_of(a) == bucket_of(b)
}

/// True iff the positions are exactly `{1..=n}` with no duplicates
///
/// Vacuously true for an empty input.
pub fn is_contiguous_permutation<I>(positions: I) -> bool
where
    I: IntoIterator<Item = u32>,
{
    let mut sorted: Vec<u32> = positions.into_iter().collect();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(idx, &pos)| pos as usize == idx + 1)
}

/// Decrement every item's position by one
///
/// Used to close the gap left by a removed item.
pub fn shift_down(items: &mut [RankedItem]) {
    for item in items {
        item.position = item.position.saturating_sub(1);
    }
}

/// Positions in `1..=count` not held by a pinned item, ascending
pub fn available_positions(count: usize, pinned: &HashSet<u32>) -> Vec<u32> {
    (1..=count as u32).filter(|p| !pinned.contains(p)).collect()
}
