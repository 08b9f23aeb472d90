//! Transport and client traits.
//!
//! Two seams keep politeness policy, URL building and the wire apart:
//!
//! - [`Transport`] performs exactly one GET and reports the raw status.
//!   It knows nothing about retries or rate limits.
//! - [`Client`] is a polite identity: it turns a URL into a body or a
//!   terminal [`FetchError`](crate::error::FetchError), applying whatever
//!   throttling and retry policy it owns.
//!
//! `Client::send` takes `&mut self` because a polite identity mutates its
//! request window on every call; the borrow checker therefore rules out
//! two concurrent callers sharing one identity.

use async_trait::async_trait;

use crate::error::{FetchResult, TransportResult};

/// Status and body of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One raw GET against the remote host.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`. Non-success statuses are returned, not raised.
    async fn get(&self, url: &str) -> TransportResult<TransportResponse>;
}

/// A polite identity toward the remote host.
#[async_trait]
pub trait Client: Send {
    /// Fetch `url` and return its body text.
    async fn send(&mut self, url: &str) -> FetchResult<String>;
}
