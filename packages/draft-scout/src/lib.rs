//! Draft Scout
//!
//! A polite crawler and schema-driven extraction library for football
//! draft prospects and draft histories.
//!
//! # Design Philosophy
//!
//! **"Be a good guest, trust the schema"**
//!
//! - One rate-limited client per polite identity, passed in explicitly
//! - Statistics layout is data ([`ExtractionSchema`]), traversal is code
//! - A record's stat block is decided by its position group and nothing else
//! - Bad cells become empty fields; only schema gaps are hard errors
//! - One athlete failing never sinks the batch
//!
//! # Usage
//!
//! ```rust,ignore
//! use draft_scout::{
//!     ClientConfig, FsPageCache, JsonStore, Pipeline, RateLimitedClient,
//! };
//!
//! let client = RateLimitedClient::from_config(ClientConfig::from_env()?)?;
//! let mut pipeline = Pipeline::new(
//!     client,
//!     FsPageCache::new("cache"),
//!     JsonStore::new("data/players.json"),
//! );
//!
//! let report = pipeline.crawl_prospects(2025).await?;
//! println!("{} of {} athletes enriched", report.enriched, report.listed);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Transport, Client, PageCache, PlayerStore)
//! - [`types`] - Positions, player records, page keys, configuration
//! - [`client`] - Rate-limited client and reqwest transport
//! - [`fetcher`] - URL building and year validation
//! - [`schema`] - Declarative per-position extraction schema
//! - [`parser`] - Listing, draft and athlete page parsing
//! - [`stores`] - Storage implementations (MemoryStore, JsonStore, etc.)
//! - [`pipeline`] - Crawl orchestration with per-athlete failure isolation
//! - [`testing`] - Mock implementations for testing

pub mod client;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use client::{RateLimitedClient, ReqwestTransport, RequestWindow};
pub use error::{
    FetchError, FetchErrorKind, ModelError, ParseError, Result, ScoutError, StoreError,
    TransportError,
};
pub use fetcher::{PageFetcher, MIN_YEAR};
pub use parser::{PageParser, Roster};
pub use pipeline::{CrawlReport, ListingKind, Pipeline};
pub use schema::{ExtractionSchema, GroupSchema, TableSpec};
pub use stores::{FsPageCache, JsonStore, MemoryPageCache, MemoryStore};
pub use traits::{
    store::{PageCache, PlayerStore},
    transport::{Client, Transport, TransportResponse},
};
pub use types::{
    config::{ClientConfig, SiteConfig},
    page::{PageKey, PageKind},
    player::{Attributes, DraftInfo, PlayerRecord, RecordKey, StatBlock, StatValue},
    position::PositionGroup,
};

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;
