//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::error::StoreResult;
use crate::traits::store::PlayerStore;
use crate::types::player::{PlayerRecord, RecordKey};

/// In-memory player store keyed by `(name, college, position)`.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    players: RwLock<BTreeMap<RecordKey, PlayerRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get the number of stored players.
    pub fn player_count(&self) -> usize {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn get(&self, key: &RecordKey) -> Option<PlayerRecord> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn upsert(&self, players: &[PlayerRecord]) -> StoreResult<()> {
        let mut stored = self
            .players
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for player in players {
            stored.insert(player.key(), player.clone());
        }
        Ok(())
    }

    async fn load_all(&self) -> StoreResult<Vec<PlayerRecord>> {
        Ok(self
            .players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.player_count())
    }
}
