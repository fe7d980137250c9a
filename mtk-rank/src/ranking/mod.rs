//! Ranked-list engine
//!
//! Maintains one ordered, bounded list of albums per owner and year. Positions
//! are always the contiguous range `1..=count`; item status constrains how an
//! item may move:
//!
//! | Status      | Move / batch                 | Randomize                 |
//! |-------------|------------------------------|---------------------------|
//! | `none`      | anywhere                     | shuffled                  |
//! | `locked`    | within its bucket of 10 only | shuffled, reset to `none` |
//! | `confirmed` | never                        | stays put                 |
//!
//! Every public operation runs in a single SQLite transaction and either
//! commits completely or writes nothing.

pub mod batch;
pub mod membership;
pub mod mover;
pub mod policy;
pub mod position;
pub mod randomizer;
pub mod status;
pub mod store;
pub mod types;

pub use types::{ItemStatus, RankedItem, RankingList, RepositionEntry, BUCKET_WIDTH, MAX_ITEMS_PER_LIST};

use rand::Rng;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::catalog::{Album, AlbumCatalog};
use crate::error::{RankError, Result};

/// Ranked item joined with its album metadata for display
#[derive(Debug, Clone, Serialize)]
pub struct RankedItemView {
    #[serde(flatten)]
    pub item: RankedItem,
    /// None when the catalog does not know the album
    pub album: Option<Album>,
}

/// A list with its items in position order
#[derive(Debug, Clone, Serialize)]
pub struct RankingView {
    pub list: RankingList,
    pub items: Vec<RankedItemView>,
}

/// Ranking engine facade
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Clone)]
pub struct RankingEngine {
    db: SqlitePool,
    catalog: AlbumCatalog,
}

impl RankingEngine {
    pub fn new(db: SqlitePool) -> Self {
        let catalog = AlbumCatalog::new(db.clone());
        Self { db, catalog }
    }

    pub fn catalog(&self) -> &AlbumCatalog {
        &self.catalog
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    pub async fn get_or_create_list(&self, owner_id: &str, year: i32) -> Result<RankingList> {
        membership::get_or_create_list(&self.db, owner_id, year).await
    }

    pub async fn add_item(&self, list_id: Uuid, album_id: Uuid) -> Result<Uuid> {
        membership::add_item(&self.db, list_id, album_id).await
    }

    pub async fn remove_item(&self, item_id: Uuid) -> Result<()> {
        membership::remove_item(&self.db, item_id).await
    }

    pub async fn move_item(&self, item_id: Uuid, new_position: u32) -> Result<()> {
        mover::move_item(&self.db, item_id, new_position).await
    }

    pub async fn set_status(&self, item_id: Uuid, status: ItemStatus) -> Result<()> {
        status::set_status(&self.db, item_id, status).await
    }

    pub async fn batch_reposition(&self, list_id: Uuid, entries: &[RepositionEntry]) -> Result<()> {
        batch::batch_reposition(&self.db, list_id, entries).await
    }

    pub async fn randomize(&self, list_id: Uuid) -> Result<()> {
        randomizer::randomize(&self.db, list_id).await
    }

    pub async fn randomize_with_rng<R>(&self, list_id: Uuid, rng: &mut R) -> Result<()>
    where
        R: Rng + Send + ?Sized,
    {
        randomizer::randomize_with_rng(&self.db, list_id, rng).await
    }

    pub async fn list_items(&self, list_id: Uuid) -> Result<Vec<RankedItem>> {
        membership::list_items(&self.db, list_id).await
    }

    pub async fn get_item(&self, item_id: Uuid) -> Result<RankedItem> {
        let mut conn = self.db.acquire().await?;
        store::fetch_item(&mut *conn, item_id)
            .await?
            .ok_or(RankError::NotFound(item_id))
    }

    /// List with album metadata joined at read time
    pub async fn list_view(&self, list_id: Uuid) -> Result<RankingView> {
        let (list, items) = {
            let mut conn = self.db.acquire().await?;
            let list = store::fetch_list(&mut *conn, list_id)
                .await?
                .ok_or(RankError::ListNotFound(list_id))?;
            let items = store::fetch_items(&mut *conn, list_id).await?;
            (list, items)
        };

        let album_ids: Vec<Uuid> = items.iter().map(|item| item.album_id).collect();
        let mut albums = self.catalog.get_albums(&album_ids).await?;

        let items = items
            .into_iter()
            .map(|item| RankedItemView {
                album: albums.remove(&item.album_id),
                item,
            })
            .collect();

        Ok(RankingView { list, items })
    }
}
