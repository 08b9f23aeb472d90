//! Integration tests for the crawl pipeline.
//!
//! These run the full fetch → cache → parse → enrich → store flow against
//! a mock client and in-memory cache and store.

use async_trait::async_trait;
use draft_scout::error::StoreResult;
use draft_scout::testing::{fixtures, MockClient};
use draft_scout::{
    ExtractionSchema, MemoryPageCache, MemoryStore, PageCache, PageKey, Pipeline, PlayerStore,
    PositionGroup, StatValue, StoreError,
};
use std::io::{Error as IoError, ErrorKind};

/// Cache whose disk is gone: every read and write fails.
struct UnreadableCache;

#[async_trait]
impl PageCache for UnreadableCache {
    async fn get_page(&self, _key: &PageKey) -> StoreResult<Option<String>> {
        Err(StoreError::Io(IoError::new(ErrorKind::PermissionDenied, "cache unreadable")))
    }

    async fn store_page(&self, _key: &PageKey, _markup: &str) -> StoreResult<()> {
        Err(StoreError::Io(IoError::new(ErrorKind::PermissionDenied, "cache unwritable")))
    }
}

const PROSPECTS_2024: &str = "https://www.pro-football-reference.com/drafts/2024_prospects.htm";
const DRAFT_2021: &str = "https://www.pro-football-reference.com/years/2021/draft.htm";

fn player_url(slug: &str) -> String {
    format!("https://www.sports-reference.com/cfb/players/{slug}.html")
}

fn listing() -> String {
    fixtures::prospects_page(&[
        (
            "QB",
            vec![
                fixtures::prospect_row("J. Doe", "22", "6-2", "210", "State", Some("/cfb/players/j-doe-1.html")),
                fixtures::prospect_row("K. Gone", "23", "6-1", "205", "Tech", Some("/cfb/players/k-gone-1.html")),
            ],
        ),
        (
            "RB",
            vec![fixtures::prospect_row("R. Back", "21", "5-10", "205", "State", Some("/cfb/players/r-back-1.html"))],
        ),
    ])
}

#[tokio::test]
async fn test_one_failed_athlete_does_not_abort_batch() {
    let client = MockClient::new()
        .with_page(PROSPECTS_2024, listing())
        .with_page(
            player_url("j-doe-1"),
            fixtures::player_page_with_bio("passing_standard", &[("pass_yds", "9,001")], "6-3", "215lb"),
        )
        .fail_url(player_url("k-gone-1"))
        .with_page(
            player_url("r-back-1"),
            fixtures::player_page("rushing_standard", &[("rush_yds", "3,120")]),
        );
    let mut pipeline = Pipeline::new(client, MemoryPageCache::new(), MemoryStore::new());

    let report = pipeline.crawl_prospects(2024).await.unwrap();

    assert_eq!(report.listed, 3);
    assert_eq!(report.enriched, 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].contains("K. Gone"));

    let stored = pipeline.store().load_all().await.unwrap();
    assert_eq!(stored.len(), 2);

    let doe = stored.iter().find(|p| p.name == "J. Doe").unwrap();
    assert_eq!(doe.height, Some(75));
    assert_eq!(doe.weight, Some(215));
    assert_eq!(doe.stat("pass_yds"), Some(StatValue::Int(9001)));

    let back = stored.iter().find(|p| p.name == "R. Back").unwrap();
    assert_eq!(back.position(), PositionGroup::RB);
    assert_eq!(back.stat("rush_yds"), Some(StatValue::Int(3120)));
}

#[tokio::test]
async fn test_cached_pages_bypass_client() {
    let cache = MemoryPageCache::new()
        .with_page(PageKey::prospects(2024), listing())
        .with_page(
            PageKey::player(2024, PositionGroup::QB, "j-doe-1"),
            fixtures::player_page("passing_standard", &[("games", "40")]),
        );
    let client = MockClient::new()
        .with_page(player_url("k-gone-1"), fixtures::player_page("passing_standard", &[]))
        .with_page(player_url("r-back-1"), fixtures::player_page("rushing_standard", &[]));
    let mut pipeline = Pipeline::new(client, cache, MemoryStore::new());

    let report = pipeline.crawl_prospects(2024).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.enriched, 3);
    assert_eq!(
        pipeline.client().calls(),
        vec![player_url("k-gone-1"), player_url("r-back-1")]
    );
}

#[tokio::test]
async fn test_fetched_pages_are_cached() {
    let client = MockClient::new()
        .with_page(
            DRAFT_2021,
            fixtures::draft_page(&[fixtures::draft_row(
                "5",
                "DE",
                "D. End",
                "22",
                "State",
                Some("/cfb/players/d-end-1.html"),
                "31",
            )]),
        )
        .with_page(
            player_url("d-end-1"),
            fixtures::player_page("defense_standard", &[("sacks", "22.5")]),
        );
    let mut pipeline = Pipeline::new(client, MemoryPageCache::new(), MemoryStore::new());

    let reports = pipeline.crawl_draft_years(2021..=2021).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].enriched, 1);

    let cache = pipeline.cache();
    assert!(cache.contains(&PageKey::draft(2021)).await.unwrap());
    assert!(cache
        .contains(&PageKey::player(2021, PositionGroup::DT, "d-end-1"))
        .await
        .unwrap());

    let stored = pipeline.store().load_all().await.unwrap();
    assert_eq!(stored[0].stat("sacks"), Some(StatValue::Float(22.5)));
    assert_eq!(stored[0].draft.as_ref().and_then(|d| d.career_av), Some(31));
}

#[tokio::test]
async fn test_recrawl_upserts_instead_of_duplicating() {
    let client = MockClient::new()
        .with_page(PROSPECTS_2024, listing())
        .with_page(player_url("j-doe-1"), fixtures::player_page("passing_standard", &[]))
        .with_page(player_url("k-gone-1"), fixtures::player_page("passing_standard", &[]))
        .with_page(player_url("r-back-1"), fixtures::player_page("rushing_standard", &[]));
    let mut pipeline = Pipeline::new(client, MemoryPageCache::new(), MemoryStore::new());

    pipeline.crawl_prospects(2024).await.unwrap();
    pipeline.crawl_prospects(2024).await.unwrap();

    assert_eq!(pipeline.store().count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_cache_errors_fall_back_to_fetching() {
    let client = MockClient::new()
        .with_page(
            PROSPECTS_2024,
            fixtures::prospects_page(&[(
                "QB",
                vec![fixtures::prospect_row("J. Doe", "22", "6-2", "210", "State", Some("/cfb/players/j-doe-1.html"))],
            )]),
        )
        .with_page(
            player_url("j-doe-1"),
            fixtures::player_page("passing_standard", &[("pass_yds", "9,001")]),
        );
    let mut pipeline = Pipeline::new(client, UnreadableCache, MemoryStore::new());

    let report = pipeline.crawl_prospects(2024).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.enriched, 1);
    assert!(report.failed.is_empty());
    assert_eq!(
        pipeline.client().calls(),
        vec![PROSPECTS_2024.to_string(), player_url("j-doe-1")]
    );

    let stored = pipeline.store().load_all().await.unwrap();
    assert_eq!(stored[0].stat("pass_yds"), Some(StatValue::Int(9001)));
}

#[tokio::test]
async fn test_schema_gap_fails_only_that_athlete() {
    let client = MockClient::new()
        .with_page(
            DRAFT_2021,
            fixtures::draft_page(&[
                fixtures::draft_row("3", "DE", "D. End", "22", "State", Some("/cfb/players/d-end-1.html"), "31"),
                fixtures::draft_row("9", "QB", "Q. Back", "21", "Tech", Some("/cfb/players/q-back-1.html"), "44"),
            ]),
        )
        .with_page(
            player_url("d-end-1"),
            fixtures::player_page("defense_standard", &[("sacks", "22.5")]),
        )
        .with_page(
            player_url("q-back-1"),
            fixtures::player_page("passing_standard", &[("pass_yds", "7,500")]),
        );
    let schema = ExtractionSchema::default().without_group(PositionGroup::DT);
    let mut pipeline =
        Pipeline::new(client, MemoryPageCache::new(), MemoryStore::new()).with_schema(schema);

    let report = pipeline.crawl_draft(2021).await.unwrap();

    assert_eq!(report.listed, 2);
    assert_eq!(report.enriched, 1);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].contains("D. End"));

    let stored = pipeline.store().load_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Q. Back");
    assert_eq!(stored[0].stat("pass_yds"), Some(StatValue::Int(7500)));
}
