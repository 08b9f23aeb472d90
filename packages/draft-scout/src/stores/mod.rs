//! Storage implementations for the scouting library.
//!
//! Available backends:
//! - `MemoryStore` - In-memory player storage (always available)
//! - `JsonStore` - One JSON file of player records (always available)
//! - `SqliteStore` - SQLite player storage (requires `sqlite` feature)
//! - `FsPageCache` / `MemoryPageCache` - Raw markup caches

pub mod json;
pub mod memory;
pub mod page_cache;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use page_cache::{FsPageCache, MemoryPageCache};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
