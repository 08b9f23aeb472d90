//! JSON file storage.
//!
//! Keeps every record in one pretty-printed array. Each upsert reads the
//! file, merges by key and rewrites it through a temporary sibling, so a
//! crash mid-write never leaves a truncated file behind.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::store::PlayerStore;
use crate::types::player::PlayerRecord;

pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> StoreResult<Vec<PlayerRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, players: &[PlayerRecord]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(players)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PlayerStore for JsonStore {
    async fn upsert(&self, players: &[PlayerRecord]) -> StoreResult<()> {
        if players.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let mut stored = self.read().await?;

        let mut index: HashMap<_, _> = stored
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key(), i))
            .collect();

        for player in players {
            match index.get(&player.key()) {
                Some(&i) => stored[i] = player.clone(),
                None => {
                    index.insert(player.key(), stored.len());
                    stored.push(player.clone());
                }
            }
        }

        self.write(&stored).await?;
        debug!(path = %self.path.display(), total = stored.len(), "Wrote player file");
        Ok(())
    }

    async fn load_all(&self) -> StoreResult<Vec<PlayerRecord>> {
        self.read().await
    }
}
