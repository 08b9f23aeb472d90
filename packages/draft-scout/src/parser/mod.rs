//! Schema-driven extraction from site markup.
//!
//! Every entry point first parses the page and splices tables hidden in
//! HTML comments back into the tree, then walks tables by id.
//!
//! - [`listing`] - prospect listings and draft histories → records
//! - [`detail`] - athlete pages → career totals, height, weight
//!
//! Parsing is synchronous and touches nothing but its inputs. `scraper`
//! documents are not `Send`, so callers finish parsing before awaiting.

pub mod detail;
pub mod listing;
pub mod markup;

pub use detail::{parse_detail, parse_height_weight};
pub use listing::{parse_draft_listing, parse_listing, Roster};

use crate::error::ParseResult;
use crate::schema::ExtractionSchema;
use crate::types::player::PlayerRecord;

/// A schema bound to the parse entry points.
#[derive(Debug, Clone, Copy)]
pub struct PageParser<'s> {
    schema: &'s ExtractionSchema,
}

impl Default for PageParser<'static> {
    fn default() -> Self {
        Self::new(ExtractionSchema::standard())
    }
}

impl<'s> PageParser<'s> {
    pub fn new(schema: &'s ExtractionSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s ExtractionSchema {
        self.schema
    }

    pub fn parse_listing(&self, markup: &str) -> Roster {
        listing::parse_listing(markup, self.schema)
    }

    pub fn parse_draft_listing(&self, markup: &str) -> Roster {
        listing::parse_draft_listing(markup, self.schema)
    }

    pub fn parse_detail(&self, markup: &str, record: &mut PlayerRecord) -> ParseResult<()> {
        detail::parse_detail(markup, record, self.schema)
    }

    pub fn parse_height_weight(&self, markup: &str, record: &mut PlayerRecord) -> bool {
        detail::parse_height_weight(markup, record)
    }
}
