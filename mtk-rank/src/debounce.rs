//! Debounced reorder writer
//!
//! Client-side companion to the engine. Moves are applied to a local copy of
//! the list immediately (optimistic), and the authoritative write is deferred:
//! each move replaces a single pending payload and restarts a quiet-period
//! timer. Only when the timer expires is one `batch_reposition` issued,
//! carrying the final ordering. Intermediate orderings are never persisted.
//!
//! Local moves go through the same [`policy::can_move`] checks as the server,
//! so a move the server would reject is rejected locally too.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{RankError, Result};
use crate::ranking::{policy, RankedItem, RankingEngine, RepositionEntry};

/// Destination for debounced reorder writes
pub trait ReorderSink: Send + Sync + 'static {
    /// Persist a full ordering of `list_id`
    fn submit(
        &self,
        list_id: Uuid,
        entries: Vec<RepositionEntry>,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl ReorderSink for RankingEngine {
    fn submit(
        &self,
        list_id: Uuid,
        entries: Vec<RepositionEntry>,
    ) -> impl Future<Output = Result<()>> + Send {
        async move { self.batch_reposition(list_id, &entries).await }
    }
}

struct DebounceState {
    list_id: Uuid,
    items: Vec<RankedItem>,
    /// Single-slot register: the ordering to write when the timer expires
    pending: Option<Vec<RepositionEntry>>,
    /// Bumped on every move so a superseded timer knows to stand down
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl DebounceState {
    fn entries(&self) -> Vec<RepositionEntry> {
        self.items
            .iter()
            .map(|item| RepositionEntry {
                item_id: item.id,
                position: item.position,
            })
            .collect()
    }

    fn cancel_timer(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

fn lock(state: &Mutex<DebounceState>) -> MutexGuard<'_, DebounceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Optimistic local ordering with debounced persistence
///
/// Must be used from within a Tokio runtime: each move spawns the timer task.
pub struct ReorderDebouncer<S: ReorderSink> {
    sink: Arc<S>,
    quiet_period: Duration,
    state: Arc<Mutex<DebounceState>>,
}

impl<S: ReorderSink> ReorderDebouncer<S> {
    /// Start from the list as last fetched from the server
    pub fn new(sink: Arc<S>, list_id: Uuid, items: Vec<RankedItem>, quiet_period: Duration) -> Self {
        Self {
            sink,
            quiet_period,
            state: Arc::new(Mutex::new(DebounceState {
                list_id,
                items,
                pending: None,
                generation: 0,
                timer: None,
            })),
        }
    }

    /// Local ordering, sorted by position
    pub fn snapshot(&self) -> Vec<RankedItem> {
        let mut items = lock(&self.state).items.clone();
        items.sort_by_key(|item| item.position);
        items
    }

    /// True while a write is waiting for its quiet period to pass
    pub fn has_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    /// Apply a move locally and (re)schedule the write
    ///
    /// Swap semantics and rejections match [`RankingEngine::move_item`].
    pub fn move_item(&self, item_id: Uuid, new_position: u32) -> Result<()> {
        let mut state = lock(&self.state);

        let idx = state
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(RankError::NotFound(item_id))?;
        let from = state.items[idx].position;
        if from == new_position {
            return Ok(());
        }

        let target_idx = state.items.iter().position(|item| item.position == new_position);
        policy::can_move(
            &state.items[idx],
            from,
            new_position,
            target_idx.map(|t| &state.items[t]),
        )?;

        if new_position == 0 {
            return Err(RankError::InvalidPosition {
                position: 0,
                reason: "positions start at 1".to_string(),
            });
        }
        if new_position as usize > state.items.len() {
            return Err(RankError::InvalidPosition {
                position: new_position,
                reason: format!("list has {} items", state.items.len()),
            });
        }

        state.items[idx].position = new_position;
        if let Some(t) = target_idx {
            state.items[t].position = from;
        }

        state.pending = Some(state.entries());
        state.cancel_timer();
        let generation = state.generation;
        state.timer = Some(tokio::spawn(expire(
            Arc::clone(&self.state),
            Arc::clone(&self.sink),
            self.quiet_period,
            generation,
        )));

        debug!(item_id = %item_id, from, to = new_position, generation, "Local move applied");
        Ok(())
    }

    /// Write the pending ordering now instead of waiting for the timer
    pub async fn flush(&self) -> Result<()> {
        let pending = {
            let mut state = lock(&self.state);
            state.cancel_timer();
            let list_id = state.list_id;
            state.pending.take().map(|entries| (list_id, entries))
        };

        match pending {
            Some((list_id, entries)) => self.sink.submit(list_id, entries).await,
            None => Ok(()),
        }
    }

    /// Replace local state with a fresh server copy, dropping any pending write
    pub fn reset(&self, items: Vec<RankedItem>) {
        let mut state = lock(&self.state);
        state.cancel_timer();
        state.pending = None;
        state.items = items;
    }
}

impl<S: ReorderSink> Drop for ReorderDebouncer<S> {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.cancel_timer();
        if state.pending.take().is_some() {
            debug!(list_id = %state.list_id, "Debouncer dropped with a pending reorder");
        }
    }
}

async fn expire<S: ReorderSink>(
    state: Arc<Mutex<DebounceState>>,
    sink: Arc<S>,
    quiet_period: Duration,
    generation: u64,
) {
    tokio::time::sleep(quiet_period).await;

    let (list_id, entries) = {
        let mut guard = lock(&state);
        if guard.generation != generation {
            return;
        }
        guard.timer = None;
        let list_id = guard.list_id;
        match guard.pending.take() {
            Some(entries) => (list_id, entries),
            None => return,
        }
    };

    match sink.submit(list_id, entries).await {
        Ok(()) => info!(list_id = %list_id, "Debounced reorder persisted"),
        Err(e) => error!(list_id = %list_id, "Debounced reorder failed: {}", e),
    }
}
