//! Listing pages: per-group prospect tables and the draft-history table.

use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::parser::markup::{
    body_rows, cell_link, cell_text, find_by_id, height_to_inches, parse_document, to_int,
};
use crate::schema::ExtractionSchema;
use crate::types::player::{DraftInfo, PlayerRecord};
use crate::types::position::PositionGroup;

/// Records grouped by position, in schema order.
pub type Roster = BTreeMap<PositionGroup, Vec<PlayerRecord>>;

fn to_u32(text: &str) -> Option<u32> {
    to_int(text).and_then(|v| u32::try_from(v).ok())
}

/// Read every `prospects_{GROUP}` table the page contains.
///
/// Groups whose table is missing are absent from the result. Repeated
/// header rows and rows without a name cell are skipped.
pub fn parse_listing(markup: &str, schema: &ExtractionSchema) -> Roster {
    let document = parse_document(markup);
    let root = document.root_element();
    let layout = &schema.listing;
    let mut roster = Roster::new();

    for group in schema.positions() {
        let table_id = layout.table_id(group);
        let Some(table) = find_by_id(root, "table", &table_id) else {
            debug!(table = %table_id, "Listing table not present");
            continue;
        };

        let mut players = Vec::new();
        for row in body_rows(table) {
            let Some(name) = cell_text(row, &layout.name_field) else {
                continue;
            };

            let mut record = PlayerRecord::new(name, group);
            record.age = cell_text(row, &layout.age_field).as_deref().and_then(to_u32);
            record.height = cell_text(row, &layout.height_field)
                .as_deref()
                .and_then(height_to_inches);
            record.weight = cell_text(row, &layout.weight_field).as_deref().and_then(to_u32);
            record.college = cell_text(row, &layout.college_field);
            record.stats_link = cell_link(row, &layout.link_field);
            players.push(record);
        }

        debug!(position = %group, count = players.len(), "Parsed listing table");
        roster.insert(group, players);
    }

    roster
}

/// Read the draft-history table, regrouping rows by position.
///
/// Raw positions with no group (punters, kickers, long snappers) are
/// dropped.
pub fn parse_draft_listing(markup: &str, schema: &ExtractionSchema) -> Roster {
    let document = parse_document(markup);
    let layout = &schema.draft_listing;
    let mut roster = Roster::new();

    let Some(table) = find_by_id(document.root_element(), "table", &layout.table_id) else {
        debug!(table = %layout.table_id, "Draft table not present");
        return roster;
    };

    for row in body_rows(table) {
        let Some(name) = cell_text(row, &layout.name_field) else {
            continue;
        };
        let raw_position = cell_text(row, &layout.position_field).unwrap_or_default();
        let Some(group) = PositionGroup::from_raw(&raw_position) else {
            trace!(player = %name, position = %raw_position, "Dropping untracked position");
            continue;
        };

        let mut record = PlayerRecord::new(name, group);
        record.age = cell_text(row, &layout.age_field).as_deref().and_then(to_u32);
        record.college = cell_text(row, &layout.college_field);
        record.stats_link = cell_link(row, &layout.link_field);
        record.draft = Some(DraftInfo {
            pick: cell_text(row, &layout.pick_field).as_deref().and_then(to_u32),
            career_av: cell_text(row, &layout.value_field).as_deref().and_then(to_int),
        });

        roster.entry(group).or_default().push(record);
    }

    roster
}
