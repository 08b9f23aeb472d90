//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, warn};

use crate::error::{TransportError, TransportResult};
use crate::traits::transport::{Transport, TransportResponse};
use crate::types::config::ClientConfig;

/// Plain HTTP GET with the configured identity and timeouts.
///
/// Does no retrying of its own; wrap it in a
/// [`RateLimitedClient`](crate::client::RateLimitedClient).
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Http(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> TransportResult<TransportResponse> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                }
            } else {
                TransportError::Http(Box::new(e))
            }
        };

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            map_err(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_err)?;
        debug!(url = %url, status, bytes = body.len(), "HTTP fetch complete");

        Ok(TransportResponse::new(status, body))
    }
}
