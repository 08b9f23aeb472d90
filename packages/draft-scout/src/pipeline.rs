//! Crawl pipeline - fetch, cache, parse, enrich and store one year.
//!
//! A [`Pipeline`] owns exactly one polite identity. Listing failures end
//! the crawl for that year; anything that goes wrong for a single athlete
//! is logged, counted and skipped so the rest of the batch still lands.

use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::{debug, error, info, warn};

use crate::error::{ParseError, Result};
use crate::fetcher::PageFetcher;
use crate::parser::{PageParser, Roster};
use crate::schema::ExtractionSchema;
use crate::traits::store::{PageCache, PlayerStore};
use crate::traits::transport::Client;
use crate::types::page::PageKey;
use crate::types::player::PlayerRecord;

/// Which listing a crawl started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Prospects,
    Draft,
}

/// Result of crawling one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlReport {
    pub year: i32,
    pub kind: ListingKind,

    /// Athletes found on the listing
    pub listed: usize,

    /// Athletes enriched from their own page and stored
    pub enriched: usize,

    /// Athletes without a stats link
    pub skipped: usize,

    /// Athletes whose page could not be fetched or parsed
    pub failed: Vec<String>,

    /// Set when the year itself could not be crawled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawlReport {
    pub fn new(year: i32, kind: ListingKind) -> Self {
        Self {
            year,
            kind,
            listed: 0,
            enriched: 0,
            skipped: 0,
            failed: Vec::new(),
            error: None,
        }
    }

    fn year_failed(year: i32, kind: ListingKind, reason: String) -> Self {
        Self {
            error: Some(reason),
            ..Self::new(year, kind)
        }
    }

    /// Check if every listed athlete was either enriched or had no link.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.failed.is_empty()
    }
}

enum Outcome {
    Enriched,
    Skipped,
    Failed(String),
}

enum Source<'a> {
    Prospects(i32),
    Draft(i32),
    Player(&'a str),
}

/// Fetch → cache → parse → enrich → store for one polite identity.
pub struct Pipeline<C, K, S> {
    client: C,
    fetcher: PageFetcher,
    cache: K,
    store: S,
    schema: ExtractionSchema,
}

impl<C, K, S> Pipeline<C, K, S>
where
    C: Client,
    K: PageCache,
    S: PlayerStore,
{
    pub fn new(client: C, cache: K, store: S) -> Self {
        Self {
            client,
            fetcher: PageFetcher::default(),
            cache,
            store,
            schema: ExtractionSchema::standard().clone(),
        }
    }

    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_schema(mut self, schema: ExtractionSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn cache(&self) -> &K {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn parser(&self) -> PageParser<'_> {
        PageParser::new(&self.schema)
    }

    /// Crawl the prospect listing for `year`.
    pub async fn crawl_prospects(&mut self, year: i32) -> Result<CrawlReport> {
        PageFetcher::validate_year(year)?;
        info!(year, "Crawling prospects");

        let markup = self
            .load(&PageKey::prospects(year), Source::Prospects(year))
            .await?;
        let roster = self.parser().parse_listing(&markup);
        self.enrich_roster(year, ListingKind::Prospects, roster).await
    }

    /// Crawl the draft history for `year`.
    pub async fn crawl_draft(&mut self, year: i32) -> Result<CrawlReport> {
        PageFetcher::validate_year(year)?;
        info!(year, "Crawling draft");

        let markup = self.load(&PageKey::draft(year), Source::Draft(year)).await?;
        let roster = self.parser().parse_draft_listing(&markup);
        self.enrich_roster(year, ListingKind::Draft, roster).await
    }

    /// Crawl several draft years. A failing year is reported, not raised.
    pub async fn crawl_draft_years(&mut self, years: RangeInclusive<i32>) -> Vec<CrawlReport> {
        let mut reports = Vec::new();
        for year in years {
            match self.crawl_draft(year).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(year, error = %e, "Draft year failed");
                    reports.push(CrawlReport::year_failed(year, ListingKind::Draft, e.to_string()));
                }
            }
        }
        reports
    }

    async fn enrich_roster(
        &mut self,
        year: i32,
        kind: ListingKind,
        roster: Roster,
    ) -> Result<CrawlReport> {
        let mut report = CrawlReport::new(year, kind);

        for (group, players) in roster {
            report.listed += players.len();
            let mut enriched = Vec::with_capacity(players.len());

            for mut player in players {
                match self.enrich(year, &mut player).await {
                    Outcome::Enriched => enriched.push(player),
                    Outcome::Skipped => report.skipped += 1,
                    Outcome::Failed(reason) => {
                        report.failed.push(format!("{} ({}): {}", player.name, group, reason))
                    }
                }
            }

            if !enriched.is_empty() {
                self.store.upsert(&enriched).await?;
                report.enriched += enriched.len();
            }
            debug!(year, position = %group, stored = enriched.len(), "Stored group");
        }

        info!(
            year,
            listed = report.listed,
            enriched = report.enriched,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Crawl complete"
        );
        Ok(report)
    }

    async fn enrich(&mut self, year: i32, player: &mut PlayerRecord) -> Outcome {
        let Some(link) = player.stats_link.clone() else {
            debug!(player = %player.name, "No stats link, skipping");
            return Outcome::Skipped;
        };

        let key = PageKey::player(year, player.position(), player.slug());
        let markup = match self.load(&key, Source::Player(&link)).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(player = %player.name, url = %link, error = %e, "Athlete fetch failed, skipping");
                return Outcome::Failed(e.to_string());
            }
        };

        match self.parser().parse_detail(&markup, player) {
            Ok(()) => Outcome::Enriched,
            Err(e @ ParseError::InvalidPosition { .. }) => {
                error!(player = %player.name, error = %e, "No schema for athlete position");
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Serve from cache, else fetch through the client and cache the result.
    async fn load(&mut self, key: &PageKey, source: Source<'_>) -> Result<String> {
        match self.cache.get_page(key).await {
            Ok(Some(markup)) => return Ok(markup),
            Ok(None) => {}
            Err(e) => warn!(page = %key, error = %e, "Cache read failed, fetching instead"),
        }

        let markup = match source {
            Source::Prospects(year) => self.fetcher.fetch_prospects(&mut self.client, year).await?,
            Source::Draft(year) => self.fetcher.fetch_draft(&mut self.client, year).await?,
            Source::Player(href) => self.fetcher.fetch_player(&mut self.client, href).await?,
        };

        if let Err(e) = self.cache.store_page(key, &markup).await {
            warn!(page = %key, error = %e, "Cache write failed");
        }
        Ok(markup)
    }
}
