//! Position groups and the raw-code lookup table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Coarse classification every raw site position collapses onto.
///
/// The statistics layout on an athlete's page differs by group, so the
/// group alone decides which stat block a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionGroup {
    QB,
    RB,
    WR,
    OL,
    DT,
    CB,
    OLB,
}

/// Raw site code → group. Codes not listed here are filtered out.
const RAW_POSITIONS: &[(&str, PositionGroup)] = &[
    ("QB", PositionGroup::QB),
    ("RB", PositionGroup::RB),
    ("FB", PositionGroup::RB),
    ("WR", PositionGroup::WR),
    ("TE", PositionGroup::WR),
    ("T", PositionGroup::OL),
    ("G", PositionGroup::OL),
    ("C", PositionGroup::OL),
    ("OT", PositionGroup::OL),
    ("OG", PositionGroup::OL),
    ("OL", PositionGroup::OL),
    ("DE", PositionGroup::DT),
    ("DT", PositionGroup::DT),
    ("NT", PositionGroup::DT),
    ("CB", PositionGroup::CB),
    ("S", PositionGroup::CB),
    ("DB", PositionGroup::CB),
    ("FS", PositionGroup::CB),
    ("SS", PositionGroup::CB),
    ("LB", PositionGroup::OLB),
    ("ILB", PositionGroup::OLB),
    ("OLB", PositionGroup::OLB),
];

impl PositionGroup {
    /// All groups in schema order.
    pub const ALL: [PositionGroup; 7] = [
        PositionGroup::QB,
        PositionGroup::RB,
        PositionGroup::WR,
        PositionGroup::OL,
        PositionGroup::DT,
        PositionGroup::CB,
        PositionGroup::OLB,
    ];

    /// Short code used in table ids and file names.
    pub fn code(&self) -> &'static str {
        match self {
            PositionGroup::QB => "QB",
            PositionGroup::RB => "RB",
            PositionGroup::WR => "WR",
            PositionGroup::OL => "OL",
            PositionGroup::DT => "DT",
            PositionGroup::CB => "CB",
            PositionGroup::OLB => "OLB",
        }
    }

    /// Collapse a raw site position code (e.g. `"S"`, `"de"`) onto its group.
    ///
    /// Returns `None` for positions the stat schema does not track
    /// (punters, kickers, long snappers, ...).
    pub fn from_raw(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_uppercase();
        RAW_POSITIONS
            .iter()
            .find(|(raw, _)| *raw == code)
            .map(|(_, group)| *group)
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PositionGroup {
    type Err = ModelError;

    /// Accepts group codes and raw site codes, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        PositionGroup::ALL
            .into_iter()
            .find(|group| group.code() == upper)
            .or_else(|| PositionGroup::from_raw(&upper))
            .ok_or_else(|| ModelError::UnknownPosition(s.to_string()))
    }
}
