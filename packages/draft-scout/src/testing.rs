//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the scouting library
//! without touching the network.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use tokio::time::Instant;

use crate::error::{FetchError, FetchResult, TransportError, TransportResult};
use crate::traits::transport::{Client, Transport, TransportResponse};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(TransportResponse),
    ConnectError,
}

/// A transport that plays back a queue of canned outcomes.
///
/// Once the queue is drained every request gets an empty `200`. Each call
/// records the (tokio) instant it happened, so paused-clock tests can
/// assert on request spacing.
#[derive(Default, Clone)]
pub struct ScriptedTransport {
    script: Arc<RwLock<VecDeque<Scripted>>>,
    calls: Arc<RwLock<Vec<(String, Instant)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(self, response: TransportResponse) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(Scripted::Respond(response));
        self
    }

    /// Queue the same response `times` times.
    pub fn respond_repeatedly(self, response: TransportResponse, times: usize) -> Self {
        {
            let mut script = self.script.write().unwrap();
            for _ in 0..times {
                script.push_back(Scripted::Respond(response.clone()));
            }
        }
        self
    }

    /// Queue a connection failure.
    pub fn fail_connect(self) -> Self {
        self.script.write().unwrap().push_back(Scripted::ConnectError);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Instants at which requests were made, in order.
    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.read().unwrap().iter().map(|(_, at)| *at).collect()
    }

    /// URLs requested, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> TransportResult<TransportResponse> {
        self.calls
            .write()
            .unwrap()
            .push((url.to_string(), Instant::now()));

        let next = self.script.write().unwrap().pop_front();
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::ConnectError) => Err(TransportError::Http(Box::new(
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ))),
            None => Ok(TransportResponse::ok("<html></html>")),
        }
    }
}

/// A polite-identity stand-in that serves pages from a map.
///
/// Unknown URLs fail as `Rejected { status: 404 }`; URLs marked with
/// [`fail_url`](Self::fail_url) fail as `Unavailable`. No pauses are taken.
#[derive(Debug, Default)]
pub struct MockClient {
    pages: HashMap<String, String>,
    fail_urls: Vec<String>,
    calls: Vec<String>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` for `url`.
    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), markup.into());
        self
    }

    /// Make `url` fail as if the host stayed down through every retry.
    pub fn fail_url(mut self, url: impl Into<String>) -> Self {
        self.fail_urls.push(url.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.clone()
    }
}

#[async_trait]
impl Client for MockClient {
    async fn send(&mut self, url: &str) -> FetchResult<String> {
        self.calls.push(url.to_string());

        if self.fail_urls.iter().any(|u| u == url) {
            return Err(FetchError::Unavailable {
                url: url.to_string(),
                attempts: 1,
                reason: "mock failure".to_string(),
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Rejected {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Markup builders shaped like the site's pages.
pub mod fixtures {
    /// One `<tr>` of a `prospects_{GROUP}` table.
    pub fn prospect_row(
        name: &str,
        age: &str,
        height: &str,
        weight: &str,
        college: &str,
        link: Option<&str>,
    ) -> String {
        let link = link
            .map(|href| format!(r#"<a href="{href}">College Stats</a>"#))
            .unwrap_or_default();
        format!(
            r#"<tr><th scope="row" data-stat="player">{name}</th><td data-stat="age">{age}</td><td data-stat="height">{height}</td><td data-stat="weight">{weight}</td><td data-stat="college_name">{college}</td><td data-stat="cfb">{link}</td></tr>"#
        )
    }

    pub fn prospects_table(group: &str, rows: &[String]) -> String {
        format!(
            r#"<table id="prospects_{group}"><thead><tr><th data-stat="player">Player</th></tr></thead><tbody>{}</tbody></table>"#,
            rows.concat()
        )
    }

    /// A full listing page with one table per `(group, rows)` entry.
    pub fn prospects_page(tables: &[(&str, Vec<String>)]) -> String {
        let body: String = tables
            .iter()
            .map(|(group, rows)| prospects_table(group, rows))
            .collect();
        format!("<html><head><title>Prospects</title></head><body>{body}</body></html>")
    }

    /// One `<tr>` of the `drafts` table.
    pub fn draft_row(
        pick: &str,
        position: &str,
        name: &str,
        age: &str,
        college: &str,
        link: Option<&str>,
        career_av: &str,
    ) -> String {
        let link = link
            .map(|href| format!(r#"<a href="{href}">College Stats</a>"#))
            .unwrap_or_default();
        format!(
            r#"<tr><th data-stat="draft_round">1</th><td data-stat="draft_pick">{pick}</td><td data-stat="player">{name}</td><td data-stat="pos">{position}</td><td data-stat="age">{age}</td><td data-stat="career_av">{career_av}</td><td data-stat="college_id">{college}</td><td data-stat="college_link">{link}</td></tr>"#
        )
    }

    pub fn draft_page(rows: &[String]) -> String {
        format!(
            r#"<html><body><table id="drafts"><tbody>{}</tbody></table></body></html>"#,
            rows.concat()
        )
    }

    /// A stats table whose footer holds a single career row.
    pub fn stat_table(id: &str, cells: &[(&str, &str)]) -> String {
        let cells: String = cells
            .iter()
            .map(|(field, value)| format!(r#"<td data-stat="{field}">{value}</td>"#))
            .collect();
        format!(
            r#"<table id="{id}"><tbody><tr><td data-stat="year_id">2023</td></tr></tbody><tfoot><tr id="{id}.Career"><th data-stat="year_id">Career</th>{cells}</tr></tfoot></table>"#
        )
    }

    /// Bio paragraph carrying height and weight spans.
    pub fn bio(height: &str, weight: &str) -> String {
        format!(r#"<p><span>{height}</span>, <span>{weight}</span>&nbsp;(188cm, 95kg)</p>"#)
    }

    /// An athlete page with one stats table.
    pub fn player_page(id: &str, cells: &[(&str, &str)]) -> String {
        format!(
            "<html><body><div id=\"info\"><p><strong>Position</strong>: QB</p></div>{}</body></html>",
            stat_table(id, cells)
        )
    }

    /// An athlete page with a bio paragraph and one stats table.
    pub fn player_page_with_bio(
        id: &str,
        cells: &[(&str, &str)],
        height: &str,
        weight: &str,
    ) -> String {
        format!(
            "<html><body><div id=\"info\">{}</div>{}</body></html>",
            bio(height, weight),
            stat_table(id, cells)
        )
    }
}
