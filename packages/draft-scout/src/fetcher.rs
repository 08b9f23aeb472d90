//! URL building and year validation for the three page kinds.
//!
//! The fetcher never owns a client. Every fetch takes the polite identity
//! as a `&mut` argument so the caller decides which identity a crawl uses
//! and a fake client can stand in during tests.

use chrono::{Datelike, Utc};
use tracing::debug;
use url::Url;

use crate::error::{Result, ScoutError};
use crate::traits::transport::Client;
use crate::types::config::SiteConfig;

/// First season the source site covers.
pub const MIN_YEAR: i32 = 1936;

/// Builds canonical URLs and delegates transfers to an injected [`Client`].
#[derive(Debug, Clone, Default)]
pub struct PageFetcher {
    site: SiteConfig,
}

impl PageFetcher {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Latest year accepted: the current calendar year.
    pub fn max_year() -> i32 {
        Utc::now().year()
    }

    pub fn validate_year(year: i32) -> Result<i32> {
        let max = Self::max_year();
        if (MIN_YEAR..=max).contains(&year) {
            Ok(year)
        } else {
            Err(ScoutError::InvalidYear {
                year,
                min: MIN_YEAR,
                max,
            })
        }
    }

    pub fn prospects_url(&self, year: i32) -> Result<String> {
        let year = Self::validate_year(year)?;
        Ok(format!("{}{}_prospects.htm", self.site.prospects_root, year))
    }

    pub fn draft_url(&self, year: i32) -> Result<String> {
        let year = Self::validate_year(year)?;
        Ok(format!("{}{}/draft.htm", self.site.draft_root, year))
    }

    /// Absolute URL of an athlete page.
    ///
    /// Links that already carry a scheme pass through; anything else is
    /// resolved against the stats origin.
    pub fn player_url(&self, href: &str) -> Result<String> {
        let href = href.trim();
        if href.is_empty() {
            return Err(ScoutError::MissingLink);
        }

        if let Ok(absolute) = Url::parse(href) {
            return Ok(absolute.into());
        }

        let invalid = |e: url::ParseError| ScoutError::InvalidLink {
            link: href.to_string(),
            reason: e.to_string(),
        };
        let base = Url::parse(&self.site.stats_origin).map_err(invalid)?;
        let resolved = base.join(href).map_err(invalid)?;
        Ok(resolved.into())
    }

    pub async fn fetch_prospects<C>(&self, client: &mut C, year: i32) -> Result<String>
    where
        C: Client + ?Sized,
    {
        let url = self.prospects_url(year)?;
        debug!(url = %url, year, "Fetching prospect listing");
        Ok(client.send(&url).await?)
    }

    pub async fn fetch_draft<C>(&self, client: &mut C, year: i32) -> Result<String>
    where
        C: Client + ?Sized,
    {
        let url = self.draft_url(year)?;
        debug!(url = %url, year, "Fetching draft listing");
        Ok(client.send(&url).await?)
    }

    pub async fn fetch_player<C>(&self, client: &mut C, href: &str) -> Result<String>
    where
        C: Client + ?Sized,
    {
        let url = self.player_url(href)?;
        debug!(url = %url, "Fetching athlete page");
        Ok(client.send(&url).await?)
    }
}
