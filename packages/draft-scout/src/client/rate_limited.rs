//! Rate-limited client: one polite identity toward the remote host.
//!
//! Wraps any [`Transport`] with the politeness contract the source site
//! expects: a sliding request window, a randomized pause before every
//! request, a single jail sleep on 429 and bounded exponential backoff
//! on server or connection failures.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::client::http::ReqwestTransport;
use crate::client::window::RequestWindow;
use crate::error::{FetchError, FetchResult, TransportResult};
use crate::traits::transport::{Client, Transport};
use crate::types::config::ClientConfig;

const TOO_MANY_REQUESTS: u16 = 429;

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(15 * 60);

/// A client that throttles, jitters and retries every request it sends.
///
/// State is mutated on every call without synchronization, so
/// [`Client::send`] takes `&mut self`. Run one instance per crawl
/// identity; parallel crawls each get their own.
pub struct RateLimitedClient<T: Transport = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
    window: RequestWindow,
}

impl RateLimitedClient<ReqwestTransport> {
    /// Build a client backed by reqwest.
    pub fn from_config(config: ClientConfig) -> TransportResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> RateLimitedClient<T> {
    /// Create a new rate-limited client.
    ///
    /// # Arguments
    /// * `transport` - The wire-level fetcher to wrap
    /// * `config` - Politeness and retry policy
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let window = RequestWindow::new(config.max_requests);
        Self {
            transport,
            config,
            window,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn window(&self) -> &RequestWindow {
        &self.window
    }

    /// Randomized pause so the request cadence is not uniform.
    async fn politeness_pause(&self) {
        let ClientConfig {
            jitter_min,
            jitter_max,
            ..
        } = self.config;

        let pause = if jitter_max > jitter_min {
            jitter_min + (jitter_max - jitter_min).mul_f64(fastrand::f64())
        } else {
            jitter_min
        };

        if !pause.is_zero() {
            sleep(pause).await;
        }
    }

    /// Block until the window has room, then record this attempt.
    async fn respect_limit(&mut self) {
        while let Some(wait) = self.window.wait_time(Instant::now(), self.config.cooldown) {
            debug!(wait_ms = wait.as_millis() as u64, "Throttling");
            sleep(wait).await;
        }
        self.window.record(Instant::now());
    }

    /// Sleep before retry number `attempt` (1-based).
    fn backoff(&self, attempt: u32) -> Duration {
        let secs = self
            .config
            .backoff_factor
            .powi(attempt.min(i32::MAX as u32) as i32);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

#[async_trait]
impl<T: Transport> Client for RateLimitedClient<T> {
    async fn send(&mut self, url: &str) -> FetchResult<String> {
        let mut failures: u32 = 0;
        let mut jailed = false;

        loop {
            self.politeness_pause().await;
            self.respect_limit().await;

            debug!(url = %url, "HTTP fetch starting");
            let reason = match self.transport.get(url).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) if response.status == TOO_MANY_REQUESTS => {
                    if jailed {
                        warn!(url = %url, "429 again after jail, giving up");
                        return Err(FetchError::RateLimited {
                            url: url.to_string(),
                        });
                    }
                    jailed = true;
                    warn!(
                        url = %url,
                        jail_secs = self.config.jail_time.as_secs(),
                        "429 received, sleeping through jail"
                    );
                    sleep(self.config.jail_time).await;
                    continue;
                }
                Ok(response) if response.status >= 500 => format!("HTTP {}", response.status),
                Ok(response) => {
                    warn!(url = %url, status = response.status, "Request rejected");
                    return Err(FetchError::Rejected {
                        url: url.to_string(),
                        status: response.status,
                    });
                }
                Err(e) => e.to_string(),
            };

            failures += 1;
            if failures > self.config.max_retries {
                warn!(url = %url, attempts = failures, reason = %reason, "Retries exhausted");
                return Err(FetchError::Unavailable {
                    url: url.to_string(),
                    attempts: failures,
                    reason,
                });
            }

            let delay = self.backoff(failures);
            warn!(
                url = %url,
                attempt = failures,
                delay_ms = delay.as_millis() as u64,
                reason = %reason,
                "Transient failure, backing off"
            );
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use crate::testing::ScriptedTransport;
    use crate::traits::transport::TransportResponse;

    fn quiet_config() -> ClientConfig {
        ClientConfig::new()
            .with_jitter(Duration::ZERO, Duration::ZERO)
            .with_cooldown(Duration::from_secs(60))
            .with_jail_time(Duration::from_secs(3600))
            .with_max_requests(20)
            .with_retries(3, 2.0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_body() {
        let transport = ScriptedTransport::new().respond(TransportResponse::ok("<html/>"));
        let mut client = RateLimitedClient::new(transport, quiet_config());

        let body = client.send("https://example.com/a").await.unwrap();

        assert_eq!(body, "<html/>");
        assert_eq!(client.transport().call_count(), 1);
        assert_eq!(client.window().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jail_then_success() {
        let transport = ScriptedTransport::new()
            .respond(TransportResponse::new(429, ""))
            .respond(TransportResponse::ok("after jail"));
        let mut client = RateLimitedClient::new(transport, quiet_config());

        let start = Instant::now();
        let body = client.send("https://example.com/a").await.unwrap();

        assert_eq!(body, "after jail");
        assert_eq!(client.transport().call_count(), 2);
        assert!(start.elapsed() >= Duration::from_secs(3600));
        assert!(start.elapsed() < Duration::from_secs(7200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_rejection_is_terminal() {
        let transport = ScriptedTransport::new()
            .respond(TransportResponse::new(429, ""))
            .respond(TransportResponse::new(429, ""))
            .respond(TransportResponse::ok("never reached"));
        let mut client = RateLimitedClient::new(transport, quiet_config());

        let err = client.send("https://example.com/a").await.unwrap_err();

        assert_eq!(err.kind(), FetchErrorKind::RateLimited);
        assert_eq!(client.transport().call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_exhaust_retries() {
        let transport = ScriptedTransport::new().respond_repeatedly(TransportResponse::new(503, ""), 10);
        let mut client = RateLimitedClient::new(transport, quiet_config());

        let start = Instant::now();
        let err = client.send("https://example.com/a").await.unwrap_err();

        assert!(matches!(err, FetchError::Unavailable { attempts: 4, .. }));
        assert_eq!(client.transport().call_count(), 4);
        // 2^1 + 2^2 + 2^3 seconds of backoff
        assert!(start.elapsed() >= Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_failure_is_retried() {
        let transport = ScriptedTransport::new()
            .fail_connect()
            .respond(TransportResponse::ok("recovered"));
        let mut client = RateLimitedClient::new(transport, quiet_config());

        assert_eq!(client.send("https://example.com/a").await.unwrap(), "recovered");
        assert_eq!(client.transport().call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_fails_fast() {
        let transport = ScriptedTransport::new().respond(TransportResponse::new(404, "missing"));
        let mut client = RateLimitedClient::new(transport, quiet_config());

        let err = client.send("https://example.com/a").await.unwrap_err();

        assert!(matches!(err, FetchError::Rejected { status: 404, .. }));
        assert_eq!(client.transport().call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_window_throttles() {
        let transport = ScriptedTransport::new();
        let config = quiet_config().with_max_requests(2);
        let mut client = RateLimitedClient::new(transport, config);

        for _ in 0..3 {
            client.send("https://example.com/a").await.unwrap();
        }

        let calls = client.transport().call_instants();
        assert_eq!(calls.len(), 3);
        assert!(calls[1] - calls[0] < Duration::from_secs(1));
        assert!(calls[2] - calls[0] >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_attempts_are_recorded() {
        let transport = ScriptedTransport::new()
            .respond(TransportResponse::new(500, ""))
            .respond(TransportResponse::ok("ok"));
        let mut client = RateLimitedClient::new(transport, quiet_config());

        client.send("https://example.com/a").await.unwrap();

        assert_eq!(client.window().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_delays_every_request() {
        let transport = ScriptedTransport::new();
        let config = quiet_config().with_jitter(Duration::from_secs(2), Duration::from_secs(2));
        let mut client = RateLimitedClient::new(transport, config);

        let start = Instant::now();
        client.send("https://example.com/a").await.unwrap();
        client.send("https://example.com/b").await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        let client = RateLimitedClient::new(ScriptedTransport::new(), quiet_config().with_retries(3, 3.0));
        assert_eq!(client.backoff(1), Duration::from_secs(3));
        assert_eq!(client.backoff(2), Duration::from_secs(9));
        assert_eq!(client.backoff(3), Duration::from_secs(27));
        assert_eq!(client.backoff(50), MAX_BACKOFF);
    }
}
