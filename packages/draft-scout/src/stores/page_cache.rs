//! Raw page caches.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::store::PageCache;
use crate::types::page::PageKey;

/// Page cache laid out on disk under a root directory.
///
/// ```text
/// {root}/pages/{year}/prospects.html
/// {root}/pages/{year}/draft.html
/// {root}/stat_pages/{year}/{GROUP}/{slug}.html
/// ```
#[derive(Debug, Clone)]
pub struct FsPageCache {
    root: PathBuf,
}

impl FsPageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &PageKey) -> PathBuf {
        self.root.join(key.relative_path())
    }
}

#[async_trait]
impl PageCache for FsPageCache {
    async fn get_page(&self, key: &PageKey) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(markup) => {
                debug!(page = %key, "Cache hit");
                Ok(Some(markup))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store_page(&self, key: &PageKey, markup: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = path.with_extension("html.tmp");
        tokio::fs::write(&staging, markup).await?;
        tokio::fs::rename(&staging, &path).await?;
        debug!(page = %key, path = %path.display(), "Cached page");
        Ok(())
    }
}

/// In-memory page cache for tests.
#[derive(Default)]
pub struct MemoryPageCache {
    pages: RwLock<HashMap<PageKey, String>>,
}

impl MemoryPageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a page.
    pub fn with_page(self, key: PageKey, markup: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, markup.into());
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl PageCache for MemoryPageCache {
    async fn get_page(&self, key: &PageKey) -> StoreResult<Option<String>> {
        Ok(self
            .pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    async fn store_page(&self, key: &PageKey, markup: &str) -> StoreResult<()> {
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), markup.to_string());
        Ok(())
    }
}
