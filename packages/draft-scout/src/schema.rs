//! Declarative extraction schema.
//!
//! The traversal in [`parser`](crate::parser) is the same for every
//! position; what differs is which tables to read and which cells to pull
//! from them. That knowledge lives here as data. Supporting a new group
//! means adding an entry, not touching the parser.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::types::position::PositionGroup;

static STANDARD: LazyLock<ExtractionSchema> = LazyLock::new(ExtractionSchema::build_standard);

/// One stats table on an athlete page and the footer cells to read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// `id` attribute of the `<table>`
    pub id: String,

    /// `data-stat` names, in read order
    pub fields: Vec<String>,
}

impl TableSpec {
    pub fn new(id: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            id: id.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Id of the career-total footer row (`"<table>.Career"`).
    pub fn career_row_id(&self) -> String {
        format!("{}.Career", self.id)
    }
}

/// Detail-page layout for one position group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSchema {
    pub tables: Vec<TableSpec>,

    /// Fields coerced as integers; every other field is floating point.
    pub int_fields: BTreeSet<String>,
}

impl GroupSchema {
    /// Build from tables plus the float fields; everything else is integer.
    pub fn with_floats(tables: Vec<TableSpec>, floats: &[&str]) -> Self {
        let int_fields = tables
            .iter()
            .flat_map(|t| t.fields.iter())
            .filter(|f| !floats.contains(&f.as_str()))
            .cloned()
            .collect();
        Self { tables, int_fields }
    }

    pub fn is_int(&self, field: &str) -> bool {
        self.int_fields.contains(field)
    }

    /// Every field name across all tables.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().flat_map(|t| t.fields.iter().map(String::as_str))
    }
}

/// Reduced layout of the per-group prospect listing tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSchema {
    /// Table ids are `{prefix}{GROUP}`
    pub table_prefix: String,
    pub name_field: String,
    pub age_field: String,
    pub height_field: String,
    pub weight_field: String,
    pub college_field: String,
    pub link_field: String,
}

impl ListingSchema {
    pub fn table_id(&self, group: PositionGroup) -> String {
        format!("{}{}", self.table_prefix, group.code())
    }
}

impl Default for ListingSchema {
    fn default() -> Self {
        Self {
            table_prefix: "prospects_".to_string(),
            name_field: "player".to_string(),
            age_field: "age".to_string(),
            height_field: "height".to_string(),
            weight_field: "weight".to_string(),
            college_field: "college_name".to_string(),
            link_field: "cfb".to_string(),
        }
    }
}

/// Layout of the single draft-history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftListingSchema {
    pub table_id: String,
    pub position_field: String,
    pub name_field: String,
    pub age_field: String,
    pub college_field: String,
    pub link_field: String,
    pub pick_field: String,
    pub value_field: String,
}

impl Default for DraftListingSchema {
    fn default() -> Self {
        Self {
            table_id: "drafts".to_string(),
            position_field: "pos".to_string(),
            name_field: "player".to_string(),
            age_field: "age".to_string(),
            college_field: "college_id".to_string(),
            link_field: "college_link".to_string(),
            pick_field: "draft_pick".to_string(),
            value_field: "career_av".to_string(),
        }
    }
}

/// Everything the parser needs to know about the site's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    pub groups: BTreeMap<PositionGroup, GroupSchema>,
    #[serde(default)]
    pub listing: ListingSchema,
    #[serde(default)]
    pub draft_listing: DraftListingSchema,
}

impl ExtractionSchema {
    /// The built-in schema, built on first use.
    pub fn standard() -> &'static ExtractionSchema {
        &STANDARD
    }

    /// Schema with default listing layouts and no group entries.
    pub fn empty() -> Self {
        Self {
            groups: BTreeMap::new(),
            listing: ListingSchema::default(),
            draft_listing: DraftListingSchema::default(),
        }
    }

    pub fn with_group(mut self, group: PositionGroup, schema: GroupSchema) -> Self {
        self.groups.insert(group, schema);
        self
    }

    pub fn without_group(mut self, group: PositionGroup) -> Self {
        self.groups.remove(&group);
        self
    }

    pub fn group(&self, group: PositionGroup) -> Option<&GroupSchema> {
        self.groups.get(&group)
    }

    /// Groups with an entry, in schema order.
    pub fn positions(&self) -> impl Iterator<Item = PositionGroup> + '_ {
        self.groups.keys().copied()
    }

    fn build_standard() -> Self {
        const DEFENSE: &str = "defense_standard";

        Self::empty()
            .with_group(
                PositionGroup::QB,
                GroupSchema::with_floats(
                    vec![
                        TableSpec::new(
                            "passing_standard",
                            &[
                                "games",
                                "games_started",
                                "pass_att",
                                "pass_td",
                                "pass_cmp_pct",
                                "pass_yds",
                                "pass_int",
                                "pass_rating",
                            ],
                        ),
                        TableSpec::new("rushing_standard", &["rush_att", "rush_yds", "rush_td"]),
                    ],
                    &["pass_cmp_pct", "pass_rating"],
                ),
            )
            .with_group(
                PositionGroup::RB,
                GroupSchema::with_floats(
                    vec![TableSpec::new(
                        "rushing_standard",
                        &["games", "rush_att", "rush_yds", "rush_td", "rec", "rec_yds", "rec_td"],
                    )],
                    &[],
                ),
            )
            .with_group(
                PositionGroup::WR,
                GroupSchema::with_floats(
                    vec![TableSpec::new(
                        "receiving_standard",
                        &["games", "rec", "rec_yds", "rec_td", "rush_att", "rush_yds", "rush_td"],
                    )],
                    &[],
                ),
            )
            .with_group(
                PositionGroup::OL,
                GroupSchema::with_floats(vec![TableSpec::new(DEFENSE, &["games"])], &[]),
            )
            .with_group(
                PositionGroup::DT,
                GroupSchema::with_floats(
                    vec![TableSpec::new(
                        DEFENSE,
                        &[
                            "games",
                            "tackles_solo",
                            "tackles_assists",
                            "tackles_loss",
                            "sacks",
                            "def_int",
                            "pass_defended",
                            "fumbles_rec",
                            "fumbles_forced",
                        ],
                    )],
                    &["tackles_loss", "sacks"],
                ),
            )
            .with_group(
                PositionGroup::CB,
                GroupSchema::with_floats(
                    vec![TableSpec::new(
                        DEFENSE,
                        &[
                            "games",
                            "tackles_solo",
                            "tackles_assists",
                            "tackles_loss",
                            "def_int",
                            "def_int_yds",
                            "pass_defended",
                            "fumbles_rec",
                            "fumbles_forced",
                        ],
                    )],
                    &["tackles_loss"],
                ),
            )
            .with_group(
                PositionGroup::OLB,
                GroupSchema::with_floats(
                    vec![TableSpec::new(
                        DEFENSE,
                        &[
                            "games",
                            "tackles_solo",
                            "tackles_assists",
                            "tackles_loss",
                            "sacks",
                            "def_int",
                            "def_int_yds",
                            "pass_defended",
                            "fumbles_rec",
                            "fumble_rec_yds",
                            "fumbles_forced",
                        ],
                    )],
                    &["tackles_loss", "sacks"],
                ),
            )
    }
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self::standard().clone()
    }
}
