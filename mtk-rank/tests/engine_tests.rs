//! Ranked-list engine integration tests
//!
//! Every test runs against a private in-memory SQLite database. After each
//! successful operation the list's positions must be exactly `1..=count`.

use mtk_common::db::init_memory_database;
use mtk_rank::ranking::position::is_contiguous_permutation;
use mtk_rank::ranking::{ItemStatus, RankedItem, RepositionEntry, MAX_ITEMS_PER_LIST};
use mtk_rank::{RankError, RankingEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

/// Test helper: engine plus a fresh list
async fn setup() -> (RankingEngine, Uuid) {
    let pool = init_memory_database().await.expect("in-memory database");
    let engine = RankingEngine::new(pool);
    let list = engine
        .get_or_create_list("owner-1", 2024)
        .await
        .expect("create list");
    (engine, list.id)
}

/// Test helper: add `n` distinct albums, returning item IDs in position order
async fn fill(engine: &RankingEngine, list_id: Uuid, n: usize) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(n);
    for _ in 0..n {
        ids.push(engine.add_item(list_id, Uuid::new_v4()).await.unwrap());
    }
    ids
}

/// Test helper: item ID -> position map snapshot in position order
async fn positions(engine: &RankingEngine, list_id: Uuid) -> Vec<(Uuid, u32)> {
    engine
        .list_items(list_id)
        .await
        .unwrap()
        .into_iter()
        .map(|item| (item.id, item.position))
        .collect()
}

async fn item(engine: &RankingEngine, item_id: Uuid) -> RankedItem {
    engine.get_item(item_id).await.unwrap()
}

async fn assert_contiguous(engine: &RankingEngine, list_id: Uuid) {
    let items = engine.list_items(list_id).await.unwrap();
    assert!(
        is_contiguous_permutation(items.iter().map(|i| i.position)),
        "positions not contiguous: {:?}",
        items.iter().map(|i| i.position).collect::<Vec<_>>()
    );
}

// =============================================================================
// Lists
// =============================================================================

#[tokio::test]
async fn test_get_or_create_list_is_idempotent() {
    let (engine, list_id) = setup().await;
    let again = engine.get_or_create_list("owner-1", 2024).await.unwrap();
    assert_eq!(again.id, list_id);

    let other_year = engine.get_or_create_list("owner-1", 2025).await.unwrap();
    assert_ne!(other_year.id, list_id);
}

// =============================================================================
// Membership
// =============================================================================

#[tokio::test]
async fn test_add_appends_with_status_none() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;

    for (idx, id) in ids.iter().enumerate() {
        let it = item(&engine, *id).await;
        assert_eq!(it.position, idx as u32 + 1);
        assert_eq!(it.status, ItemStatus::None);
        assert_eq!(it.list_id, list_id);
    }
    assert_contiguous(&engine, list_id).await;
}

#[tokio::test]
async fn test_add_to_full_list_fails() {
    let (engine, list_id) = setup().await;
    fill(&engine, list_id, MAX_ITEMS_PER_LIST).await;

    let err = engine.add_item(list_id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RankError::ListFull { max: 50, .. }), "got {:?}", err);
    assert_eq!(engine.list_items(list_id).await.unwrap().len(), 50);
}

#[tokio::test]
async fn test_add_to_full_list_reports_full_even_for_duplicate() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, MAX_ITEMS_PER_LIST).await;
    let existing_album = item(&engine, ids[0]).await.album_id;

    let err = engine.add_item(list_id, existing_album).await.unwrap_err();
    assert!(matches!(err, RankError::ListFull { .. }));
}

#[tokio::test]
async fn test_add_duplicate_album_fails() {
    let (engine, list_id) = setup().await;
    let album = Uuid::new_v4();
    engine.add_item(list_id, album).await.unwrap();

    let err = engine.add_item(list_id, album).await.unwrap_err();
    assert!(matches!(err, RankError::AlreadyExists { album_id, .. } if album_id == album));
    assert_eq!(engine.list_items(list_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_album_allowed_in_different_lists() {
    let (engine, list_id) = setup().await;
    let other = engine.get_or_create_list("owner-2", 2024).await.unwrap();
    let album = Uuid::new_v4();

    engine.add_item(list_id, album).await.unwrap();
    engine.add_item(other.id, album).await.unwrap();
}

#[tokio::test]
async fn test_add_to_unknown_list_fails() {
    let (engine, _) = setup().await;
    let missing = Uuid::new_v4();
    let err = engine.add_item(missing, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RankError::ListNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_remove_middle_item_shifts_later_items() {
    // [A:1, B:2, C:3]; remove B -> [A:1, C:2]
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    engine.remove_item(b).await.unwrap();

    assert_eq!(positions(&engine, list_id).await, vec![(a, 1), (c, 2)]);
}

#[tokio::test]
async fn test_remove_shifts_every_later_item() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 12).await;

    engine.remove_item(ids[4]).await.unwrap();

    let after = positions(&engine, list_id).await;
    assert_eq!(after.len(), 11);
    for (idx, id) in ids.iter().enumerate() {
        let expected = match idx {
            i if i < 4 => Some(i as u32 + 1),
            4 => None,
            i => Some(i as u32),
        };
        let actual = after.iter().find(|(x, _)| x == id).map(|(_, p)| *p);
        assert_eq!(actual, expected, "item at original index {}", idx);
    }
    assert_contiguous(&engine, list_id).await;
}

#[tokio::test]
async fn test_remove_keeps_statuses() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 4).await;
    engine.set_status(ids[3], ItemStatus::Confirmed).await.unwrap();

    engine.remove_item(ids[0]).await.unwrap();

    let last = item(&engine, ids[3]).await;
    assert_eq!(last.position, 3);
    assert_eq!(last.status, ItemStatus::Confirmed);
}

#[tokio::test]
async fn test_remove_missing_item_is_noop() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 2).await;

    engine.remove_item(Uuid::new_v4()).await.unwrap();
    engine.remove_item(ids[0]).await.unwrap();
    engine.remove_item(ids[0]).await.unwrap();

    assert_eq!(positions(&engine, list_id).await, vec![(ids[1], 1)]);
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn test_set_status_unknown_item() {
    let (engine, _) = setup().await;
    let missing = Uuid::new_v4();
    let err = engine.set_status(missing, ItemStatus::Locked).await.unwrap_err();
    assert!(matches!(err, RankError::NotFound(id) if id == missing));
}

#[tokio::test]
async fn test_confirmed_can_be_unconfirmed_without_moving() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;

    engine.set_status(ids[1], ItemStatus::Confirmed).await.unwrap();
    engine.set_status(ids[1], ItemStatus::None).await.unwrap();

    let it = item(&engine, ids[1]).await;
    assert_eq!(it.status, ItemStatus::None);
    assert_eq!(it.position, 2);

    // Now free to move again
    engine.move_item(ids[1], 3).await.unwrap();
}

// =============================================================================
// Move
// =============================================================================

#[tokio::test]
async fn test_move_swaps_exactly_two_items() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 5).await;

    engine.move_item(ids[0], 4).await.unwrap();

    assert_eq!(
        positions(&engine, list_id).await,
        vec![(ids[3], 1), (ids[1], 2), (ids[2], 3), (ids[0], 4), (ids[4], 5)]
    );
}

#[tokio::test]
async fn test_move_to_same_position_is_noop() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;
    engine.set_status(ids[1], ItemStatus::Confirmed).await.unwrap();

    // Even a confirmed item may "move" onto itself
    engine.move_item(ids[1], 2).await.unwrap();
    assert_eq!(item(&engine, ids[1]).await.position, 2);
}

#[tokio::test]
async fn test_move_confirmed_item_fails() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 10).await;
    engine.set_status(ids[4], ItemStatus::Confirmed).await.unwrap();
    let before = positions(&engine, list_id).await;

    let err = engine.move_item(ids[4], 8).await.unwrap_err();
    assert!(matches!(err, RankError::ConfirmedImmutable(id) if id == ids[4]));
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_confirmed_item_reports_immutable_for_any_target() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;
    engine.set_status(ids[1], ItemStatus::Confirmed).await.unwrap();
    let before = positions(&engine, list_id).await;

    for target in [0, 1, 3, 99] {
        let err = engine.move_item(ids[1], target).await.unwrap_err();
        assert!(
            matches!(err, RankError::ConfirmedImmutable(id) if id == ids[1]),
            "target {} gave {:?}",
            target,
            err
        );
    }
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_move_onto_confirmed_target_fails() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 5).await;
    engine.set_status(ids[2], ItemStatus::Confirmed).await.unwrap();
    let before = positions(&engine, list_id).await;

    let err = engine.move_item(ids[0], 3).await.unwrap_err();
    assert!(matches!(err, RankError::TargetConfirmed { position: 3, .. }));
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_locked_item_cannot_leave_bucket() {
    // 10 items, item at 7 locked (bucket 1..=10); move to 15 fails
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 10).await;
    engine.set_status(ids[6], ItemStatus::Locked).await.unwrap();
    let before = positions(&engine, list_id).await;

    let err = engine.move_item(ids[6], 15).await.unwrap_err();
    assert!(matches!(err, RankError::BucketViolation { from_bucket: 1, to_bucket: 2, .. }));
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_locked_item_moves_within_bucket_and_keeps_status() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 25).await;
    engine.set_status(ids[12], ItemStatus::Locked).await.unwrap();

    let err = engine.move_item(ids[12], 10).await.unwrap_err();
    assert!(matches!(err, RankError::BucketViolation { .. }));

    engine.move_item(ids[12], 20).await.unwrap();
    let moved = item(&engine, ids[12]).await;
    assert_eq!(moved.position, 20);
    assert_eq!(moved.status, ItemStatus::Locked);
    assert_eq!(item(&engine, ids[19]).await.position, 13);
    assert_contiguous(&engine, list_id).await;
}

#[tokio::test]
async fn test_free_item_may_swap_with_locked_item_across_buckets() {
    // Only the moving item's lock is checked
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 15).await;
    engine.set_status(ids[13], ItemStatus::Locked).await.unwrap();

    engine.move_item(ids[0], 14).await.unwrap();
    assert_eq!(item(&engine, ids[13]).await.position, 1);
}

#[tokio::test]
async fn test_move_out_of_range_fails() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;
    let before = positions(&engine, list_id).await;

    assert!(matches!(
        engine.move_item(ids[0], 4).await,
        Err(RankError::InvalidPosition { position: 4, .. })
    ));
    assert!(matches!(
        engine.move_item(ids[0], 0).await,
        Err(RankError::InvalidPosition { position: 0, .. })
    ));
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_move_unknown_item_fails() {
    let (engine, _) = setup().await;
    assert!(matches!(
        engine.move_item(Uuid::new_v4(), 1).await,
        Err(RankError::NotFound(_))
    ));
}

// =============================================================================
// Batch reposition
// =============================================================================

#[tokio::test]
async fn test_batch_applies_full_permutation() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 4).await;

    let entries: Vec<RepositionEntry> = ids
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, id)| RepositionEntry {
            item_id: *id,
            position: idx as u32 + 1,
        })
        .collect();
    engine.batch_reposition(list_id, &entries).await.unwrap();

    assert_eq!(
        positions(&engine, list_id).await,
        vec![(ids[3], 1), (ids[2], 2), (ids[1], 3), (ids[0], 4)]
    );
}

#[tokio::test]
async fn test_batch_with_confirmed_move_rejects_everything() {
    // item at 5 confirmed; [{item, 8}, {other, 5}] fails as a whole
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 10).await;
    let confirmed = ids[4];
    let other = ids[7];
    engine.set_status(confirmed, ItemStatus::Confirmed).await.unwrap();

    assert!(matches!(
        engine.move_item(confirmed, 8).await,
        Err(RankError::ConfirmedImmutable(_))
    ));

    let before = positions(&engine, list_id).await;
    let err = engine
        .batch_reposition(
            list_id,
            &[
                RepositionEntry { item_id: confirmed, position: 8 },
                RepositionEntry { item_id: other, position: 5 },
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RankError::ConfirmedMoved { from: 5, to: 8, .. }));
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_batch_rejects_when_bad_entry_comes_last() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;
    engine.set_status(ids[2], ItemStatus::Confirmed).await.unwrap();
    let before = positions(&engine, list_id).await;

    let err = engine
        .batch_reposition(
            list_id,
            &[
                RepositionEntry { item_id: ids[0], position: 2 },
                RepositionEntry { item_id: ids[1], position: 1 },
                RepositionEntry { item_id: ids[2], position: 1 },
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RankError::ConfirmedMoved { .. }));
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_batch_confirmed_entry_at_same_position_is_fine() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;
    engine.set_status(ids[1], ItemStatus::Confirmed).await.unwrap();

    engine
        .batch_reposition(
            list_id,
            &[
                RepositionEntry { item_id: ids[0], position: 3 },
                RepositionEntry { item_id: ids[1], position: 2 },
                RepositionEntry { item_id: ids[2], position: 1 },
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        positions(&engine, list_id).await,
        vec![(ids[2], 1), (ids[1], 2), (ids[0], 3)]
    );
}

#[tokio::test]
async fn test_batch_unknown_item_fails() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 2).await;
    let missing = Uuid::new_v4();
    let before = positions(&engine, list_id).await;

    let err = engine
        .batch_reposition(
            list_id,
            &[
                RepositionEntry { item_id: ids[0], position: 2 },
                RepositionEntry { item_id: missing, position: 1 },
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RankError::NotFound(id) if id == missing));
    assert_eq!(positions(&engine, list_id).await, before);
}

#[tokio::test]
async fn test_batch_item_from_other_list_fails() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 2).await;
    let other = engine.get_or_create_list("owner-2", 2024).await.unwrap();
    let foreign = engine.add_item(other.id, Uuid::new_v4()).await.unwrap();

    let err = engine
        .batch_reposition(
            list_id,
            &[
                RepositionEntry { item_id: ids[0], position: 2 },
                RepositionEntry { item_id: foreign, position: 1 },
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RankError::WrongList { item_id, expected, actual }
            if item_id == foreign && expected == list_id && actual == other.id
    ));
    assert_eq!(item(&engine, ids[0]).await.position, 1);
}

#[tokio::test]
async fn test_batch_trusts_caller_permutation() {
    // A partial batch that leaves a duplicate is applied as submitted
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 3).await;

    engine
        .batch_reposition(list_id, &[RepositionEntry { item_id: ids[0], position: 2 }])
        .await
        .unwrap();

    assert_eq!(item(&engine, ids[0]).await.position, 2);
    assert_eq!(item(&engine, ids[1]).await.position, 2);
}

#[tokio::test]
async fn test_empty_batch_is_noop() {
    let (engine, list_id) = setup().await;
    fill(&engine, list_id, 2).await;
    let before = positions(&engine, list_id).await;

    engine.batch_reposition(list_id, &[]).await.unwrap();
    assert_eq!(positions(&engine, list_id).await, before);
}

// =============================================================================
// Randomize
// =============================================================================

#[tokio::test]
async fn test_randomize_pins_confirmed_and_resets_others() {
    // 10 items, item at 4 confirmed, rest none/locked
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 10).await;
    engine.set_status(ids[3], ItemStatus::Confirmed).await.unwrap();
    engine.set_status(ids[0], ItemStatus::Locked).await.unwrap();
    engine.set_status(ids[8], ItemStatus::Locked).await.unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    engine.randomize_with_rng(list_id, &mut rng).await.unwrap();

    let items = engine.list_items(list_id).await.unwrap();
    assert_eq!(items.len(), 10);

    let pinned = items.iter().find(|i| i.id == ids[3]).unwrap();
    assert_eq!(pinned.position, 4);
    assert_eq!(pinned.status, ItemStatus::Confirmed);

    let mut others: Vec<u32> = items
        .iter()
        .filter(|i| i.id != ids[3])
        .map(|i| {
            assert_eq!(i.status, ItemStatus::None, "item {} kept its status", i.id);
            i.position
        })
        .collect();
    others.sort_unstable();
    assert_eq!(others, vec![1, 2, 3, 5, 6, 7, 8, 9, 10]);
}

#[tokio::test]
async fn test_randomize_never_moves_confirmed_items() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 20).await;
    for idx in [0, 9, 10, 19] {
        engine.set_status(ids[idx], ItemStatus::Confirmed).await.unwrap();
    }

    for _ in 0..5 {
        engine.randomize(list_id).await.unwrap();
        for idx in [0usize, 9, 10, 19] {
            let it = item(&engine, ids[idx]).await;
            assert_eq!(it.position, idx as u32 + 1);
            assert_eq!(it.status, ItemStatus::Confirmed);
        }
        assert_contiguous(&engine, list_id).await;
    }
}

#[tokio::test]
async fn test_randomize_empty_list_is_noop() {
    let (engine, list_id) = setup().await;
    engine.randomize(list_id).await.unwrap();
    assert!(engine.list_items(list_id).await.unwrap().is_empty());
}

// =============================================================================
// Invariant across a mixed sequence
// =============================================================================

#[tokio::test]
async fn test_positions_stay_contiguous_through_mixed_operations() {
    let (engine, list_id) = setup().await;
    let ids = fill(&engine, list_id, 15).await;
    assert_contiguous(&engine, list_id).await;

    engine.set_status(ids[2], ItemStatus::Locked).await.unwrap();
    engine.move_item(ids[2], 9).await.unwrap();
    assert_contiguous(&engine, list_id).await;

    engine.remove_item(ids[5]).await.unwrap();
    assert_contiguous(&engine, list_id).await;

    engine.set_status(ids[0], ItemStatus::Confirmed).await.unwrap();
    engine.randomize(list_id).await.unwrap();
    assert_contiguous(&engine, list_id).await;

    engine.add_item(list_id, Uuid::new_v4()).await.unwrap();
    assert_contiguous(&engine, list_id).await;

    // Rejected operations leave no trace either
    let _ = engine.move_item(ids[0], 2).await;
    assert_contiguous(&engine, list_id).await;

    engine.remove_item(ids[14]).await.unwrap();
    engine.remove_item(ids[1]).await.unwrap();
    assert_contiguous(&engine, list_id).await;
    assert_eq!(engine.list_items(list_id).await.unwrap().len(), 13);
}

#[tokio::test]
async fn test_list_view_joins_catalog() {
    use mtk_rank::catalog::Album;

    let (engine, list_id) = setup().await;
    let known = Album {
        id: Uuid::new_v4(),
        title: "Known".to_string(),
        artist: "Artist".to_string(),
        release_year: Some(2024),
        cover_url: None,
    };
    engine.catalog().upsert_album(&known).await.unwrap();

    engine.add_item(list_id, known.id).await.unwrap();
    engine.add_item(list_id, Uuid::new_v4()).await.unwrap();

    let view = engine.list_view(list_id).await.unwrap();
    assert_eq!(view.list.id, list_id);
    assert_eq!(view.items.len(), 2);
    assert_eq!(view.items[0].album.as_ref().map(|a| a.title.as_str()), Some("Known"));
    assert!(view.items[1].album.is_none());
}

#[tokio::test]
async fn test_list_view_unknown_list() {
    let (engine, _) = setup().await;
    assert!(matches!(
        engine.list_view(Uuid::new_v4()).await,
        Err(RankError::ListNotFound(_))
    ));
}
