//! Typed errors for the scouting library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Field-level coercion
//! failures are deliberately absent: a bad cell becomes `None`.

use thiserror::Error;

/// Top-level errors surfaced by fetch, parse and persistence operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Year outside the range the source site covers
    #[error("year {year} out of range ({min}..={max})")]
    InvalidYear { year: i32, min: i32, max: i32 },

    /// Player link was empty
    #[error("no stats link provided")]
    MissingLink,

    /// Player link could not be resolved to an absolute URL
    #[error("invalid stats link {link}: {reason}")]
    InvalidLink { link: String, reason: String },

    /// Remote fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Markup could not be mapped onto a record
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    /// Record construction failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Persistence failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration value missing or malformed
    #[error("config error: {0}")]
    Config(String),
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    RateLimited,
    Unavailable,
    Rejected,
}

/// Terminal outcome of one polite request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered 429 again after the jail period
    #[error("rate limited by remote host: {url}")]
    RateLimited { url: String },

    /// 5xx or connection failures outlasted the retry budget
    #[error("unavailable after {attempts} attempts: {url} ({reason})")]
    Unavailable {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// Non-retryable client error
    #[error("rejected with HTTP {status}: {url}")]
    Rejected { url: String, status: u16 },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::RateLimited { .. } => FetchErrorKind::RateLimited,
            FetchError::Unavailable { .. } => FetchErrorKind::Unavailable,
            FetchError::Rejected { .. } => FetchErrorKind::Rejected,
        }
    }

    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::RateLimited { url }
            | FetchError::Unavailable { url, .. }
            | FetchError::Rejected { url, .. } => url,
        }
    }
}

/// Failures of a single transport attempt (before retry policy applies).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be sent or the body could not be read
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Connect or read timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

/// Errors from the extraction engine.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The record's position group has no schema entry
    #[error("no extraction schema for position {position}")]
    InvalidPosition { position: String },
}

/// Errors from building a [`PlayerRecord`](crate::types::player::PlayerRecord).
#[derive(Debug, Error)]
pub enum ModelError {
    /// Position code maps to no known group
    #[error("unknown position: {0}")]
    UnknownPosition(String),

    /// Name attribute missing or blank
    #[error("player name is required")]
    MissingName,
}

/// Errors from player stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for scouting operations.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for polite fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for a single transport attempt.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Result type alias for parsing.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for persistence.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
