//! Storage traits for raw pages and finished player records.
//!
//! The storage layer is split into two focused traits:
//! - `PageCache`: raw markup keyed by [`PageKey`], so a crawl can skip
//!   the network entirely for pages it already has
//! - `PlayerStore`: idempotent upsert of enriched records keyed by
//!   `(name, college, position)`

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{page::PageKey, player::PlayerRecord};

/// Cache for raw page markup.
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Get cached markup for a page.
    async fn get_page(&self, key: &PageKey) -> StoreResult<Option<String>>;

    /// Store markup for a page, replacing any previous copy.
    async fn store_page(&self, key: &PageKey, markup: &str) -> StoreResult<()>;

    /// Whether markup is cached for a page.
    async fn contains(&self, key: &PageKey) -> StoreResult<bool> {
        Ok(self.get_page(key).await?.is_some())
    }
}

/// Persistence boundary for player records.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Insert or replace records, keyed by [`PlayerRecord::key`].
    async fn upsert(&self, players: &[PlayerRecord]) -> StoreResult<()>;

    /// Every stored record.
    async fn load_all(&self) -> StoreResult<Vec<PlayerRecord>>;

    /// Number of stored records.
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.load_all().await?.len())
    }
}
