//! Configuration types for the polite client and target site.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, ScoutError};

/// Default identity announced to the remote host.
pub const DEFAULT_USER_AGENT: &str =
    "prospect_clustering-bot/1.0 (+https://github.com/TRMart27/NextGenSleeper)";

/// Politeness and retry policy for one [`RateLimitedClient`](crate::client::RateLimitedClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long a full window must age before another request may leave.
    pub cooldown: Duration,

    /// Punitive sleep after the host answers 429.
    pub jail_time: Duration,

    /// Window capacity: requests allowed per `cooldown`.
    pub max_requests: usize,

    /// Retries for 5xx / connection failures.
    pub max_retries: u32,

    /// Backoff base; attempt `n` sleeps `backoff_factor^n` seconds.
    pub backoff_factor: f64,

    pub user_agent: String,

    /// Bounds of the randomized pause taken before every request.
    pub jitter_min: Duration,
    pub jitter_max: Duration,

    /// Whole-request timeout.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(60),
            jail_time: Duration::from_secs(3600),
            max_requests: 20,
            max_retries: 3,
            backoff_factor: 3.0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            jitter_min: Duration::from_millis(1270),
            jitter_max: Duration::from_millis(2840),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(4),
        }
    }
}

impl ClientConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `PFR_*` environment variables, falling back to defaults.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `PFR_REQUEST_COOLDOWN` | cooldown (seconds) |
    /// | `PFR_REQUEST_JAIL` | jail_time (seconds) |
    /// | `PFR_REQUEST_MAX` | max_requests |
    /// | `PFR_MAX_RETRIES` | max_retries |
    /// | `PFR_BACKOFF_FACTOR` | backoff_factor |
    /// | `PFR_USER_AGENT` | user_agent |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cooldown: u64 = parse_var(&lookup, "PFR_REQUEST_COOLDOWN", defaults.cooldown.as_secs())?;
        let jail: u64 = parse_var(&lookup, "PFR_REQUEST_JAIL", defaults.jail_time.as_secs())?;
        let max_requests: usize = parse_var(&lookup, "PFR_REQUEST_MAX", defaults.max_requests)?;
        let max_retries: u32 = parse_var(&lookup, "PFR_MAX_RETRIES", defaults.max_retries)?;
        let backoff_factor: f64 =
            parse_var(&lookup, "PFR_BACKOFF_FACTOR", defaults.backoff_factor)?;

        if max_requests == 0 {
            return Err(ScoutError::Config("PFR_REQUEST_MAX must be > 0".to_string()));
        }
        if !backoff_factor.is_finite() || backoff_factor < 0.0 {
            return Err(ScoutError::Config(
                "PFR_BACKOFF_FACTOR must be a non-negative number".to_string(),
            ));
        }

        Ok(Self {
            cooldown: Duration::from_secs(cooldown),
            jail_time: Duration::from_secs(jail),
            max_requests,
            max_retries,
            backoff_factor,
            user_agent: lookup("PFR_USER_AGENT")
                .filter(|ua| !ua.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            ..defaults
        })
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_jail_time(mut self, jail_time: Duration) -> Self {
        self.jail_time = jail_time;
        self
    }

    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests.max(1);
        self
    }

    pub fn with_retries(mut self, max_retries: u32, backoff_factor: f64) -> Self {
        self.max_retries = max_retries;
        self.backoff_factor = backoff_factor;
        self
    }

    /// Set the politeness pause bounds. `min == max` gives a fixed pause.
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter_min = min.min(max);
        self.jitter_max = max.max(min);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ScoutError::Config(format!("{key} has invalid value {raw:?}"))),
        _ => Ok(default),
    }
}

/// URL roots of the crawled site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root of the prospect listings (`{root}{year}_prospects.htm`)
    pub prospects_root: String,

    /// Root of the draft histories (`{root}{year}/draft.htm`)
    pub draft_root: String,

    /// Origin relative athlete links are resolved against
    pub stats_origin: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            prospects_root: "https://www.pro-football-reference.com/drafts/".to_string(),
            draft_root: "https://www.pro-football-reference.com/years/".to_string(),
            stats_origin: "https://www.sports-reference.com".to_string(),
        }
    }
}
