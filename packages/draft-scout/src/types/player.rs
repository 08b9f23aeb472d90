//! Player records and their position-specific stat blocks.
//!
//! A [`PlayerRecord`] carries the biographical fields every athlete shares
//! plus exactly one [`StatBlock`] variant. The variant is chosen from the
//! record's [`PositionGroup`] when the record is built and cannot be
//! swapped afterwards, so a quarterback can never end up holding
//! defensive tallies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;
use crate::parser::markup::{height_to_inches, to_float, to_int};
use crate::types::position::PositionGroup;

/// Loosely-typed attribute bag accepted by [`PlayerRecord::from_attributes`].
pub type Attributes = serde_json::Map<String, Value>;

/// A single coerced statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Float(f64),
}

impl StatValue {
    pub fn as_i64(&self) -> i64 {
        match self {
            StatValue::Int(v) => *v,
            StatValue::Float(v) => v.round() as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            StatValue::Int(v) => *v as f64,
            StatValue::Float(v) => *v,
        }
    }
}

/// Declares a stat struct whose fields are addressable by schema name.
macro_rules! stat_struct {
    (
        $(#[$meta:meta])*
        $name:ident {
            ints: [$($int:ident),* $(,)?],
            floats: [$($float:ident),* $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $int: Option<i64>,)*
            $(pub $float: Option<f64>,)*
        }

        impl $name {
            fn set(&mut self, field: &str, value: Option<StatValue>) -> bool {
                match field {
                    $(stringify!($int) => {
                        self.$int = value.map(|v| v.as_i64());
                        true
                    })*
                    $(stringify!($float) => {
                        self.$float = value.map(|v| v.as_f64());
                        true
                    })*
                    _ => false,
                }
            }

            fn get(&self, field: &str) -> Option<StatValue> {
                match field {
                    $(stringify!($int) => self.$int.map(StatValue::Int),)*
                    $(stringify!($float) => self.$float.map(StatValue::Float),)*
                    _ => None,
                }
            }
        }
    };
}

stat_struct! {
    /// Career passing plus rushing totals.
    QuarterbackStats {
        ints: [games, games_started, pass_att, pass_td, pass_yds, pass_int, rush_att, rush_yds, rush_td],
        floats: [pass_cmp_pct, pass_rating],
    }
}

stat_struct! {
    /// Career rushing plus receiving totals (backs and receivers).
    SkillStats {
        ints: [games, rush_att, rush_yds, rush_td, rec, rec_yds, rec_td],
        floats: [],
    }
}

stat_struct! {
    /// Linemen only get credited with games played.
    LineStats {
        ints: [games],
        floats: [],
    }
}

stat_struct! {
    /// Career defensive tallies.
    DefensiveStats {
        ints: [
            games,
            tackles_solo,
            tackles_assists,
            def_int,
            def_int_yds,
            pass_defended,
            fumbles_rec,
            fumble_rec_yds,
            fumbles_forced,
        ],
        floats: [tackles_loss, sacks],
    }
}

/// Position-specific statistics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "totals", rename_all = "snake_case")]
pub enum StatBlock {
    Quarterback(QuarterbackStats),
    RunningBack(SkillStats),
    WideReceiver(SkillStats),
    OffensiveLine(LineStats),
    DefensiveLine(DefensiveStats),
    Cornerback(DefensiveStats),
    Linebacker(DefensiveStats),
}

impl StatBlock {
    /// Empty block of the shape `group` requires.
    pub fn for_group(group: PositionGroup) -> Self {
        match group {
            PositionGroup::QB => StatBlock::Quarterback(QuarterbackStats::default()),
            PositionGroup::RB => StatBlock::RunningBack(SkillStats::default()),
            PositionGroup::WR => StatBlock::WideReceiver(SkillStats::default()),
            PositionGroup::OL => StatBlock::OffensiveLine(LineStats::default()),
            PositionGroup::DT => StatBlock::DefensiveLine(DefensiveStats::default()),
            PositionGroup::CB => StatBlock::Cornerback(DefensiveStats::default()),
            PositionGroup::OLB => StatBlock::Linebacker(DefensiveStats::default()),
        }
    }

    /// Group this block belongs to.
    pub fn group(&self) -> PositionGroup {
        match self {
            StatBlock::Quarterback(_) => PositionGroup::QB,
            StatBlock::RunningBack(_) => PositionGroup::RB,
            StatBlock::WideReceiver(_) => PositionGroup::WR,
            StatBlock::OffensiveLine(_) => PositionGroup::OL,
            StatBlock::DefensiveLine(_) => PositionGroup::DT,
            StatBlock::Cornerback(_) => PositionGroup::CB,
            StatBlock::Linebacker(_) => PositionGroup::OLB,
        }
    }

    /// Write a stat by schema field name. Returns `false` for names this
    /// block has no slot for.
    pub fn set(&mut self, field: &str, value: Option<StatValue>) -> bool {
        match self {
            StatBlock::Quarterback(s) => s.set(field, value),
            StatBlock::RunningBack(s) | StatBlock::WideReceiver(s) => s.set(field, value),
            StatBlock::OffensiveLine(s) => s.set(field, value),
            StatBlock::DefensiveLine(s) | StatBlock::Cornerback(s) | StatBlock::Linebacker(s) => {
                s.set(field, value)
            }
        }
    }

    /// Read a stat by schema field name.
    pub fn get(&self, field: &str) -> Option<StatValue> {
        match self {
            StatBlock::Quarterback(s) => s.get(field),
            StatBlock::RunningBack(s) | StatBlock::WideReceiver(s) => s.get(field),
            StatBlock::OffensiveLine(s) => s.get(field),
            StatBlock::DefensiveLine(s) | StatBlock::Cornerback(s) | StatBlock::Linebacker(s) => {
                s.get(field)
            }
        }
    }
}

/// Draft outcome for athletes read from a draft-history page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftInfo {
    /// Overall pick number
    pub pick: Option<u32>,

    /// Cumulative career approximate value
    pub career_av: Option<i64>,
}

/// Identity used for idempotent upserts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub name: String,
    pub college: Option<String>,
    pub position: PositionGroup,
}

/// An athlete with biographical fields and a group-shaped stat block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordRepr")]
pub struct PlayerRecord {
    pub name: String,
    position: PositionGroup,
    pub age: Option<u32>,
    /// Height in inches
    pub height: Option<u32>,
    /// Weight in pounds
    pub weight: Option<u32>,
    pub college: Option<String>,
    pub stats_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<DraftInfo>,
    stats: StatBlock,
}

impl PlayerRecord {
    /// Create an empty record for `group`.
    pub fn new(name: impl Into<String>, group: PositionGroup) -> Self {
        Self {
            name: name.into(),
            position: group,
            age: None,
            height: None,
            weight: None,
            college: None,
            stats_link: None,
            draft: None,
            stats: StatBlock::for_group(group),
        }
    }

    /// Build a record from a position code and a loosely-typed attribute bag.
    ///
    /// The code is case-normalized and may be a group code (`"qb"`, `"OLB"`)
    /// or a raw site code (`"S"`, `"DE"`). Numeric attributes may be JSON
    /// numbers or numeric strings; `height` also accepts `"6-2"`.
    /// Unreadable optional attributes are left empty.
    pub fn from_attributes(position: &str, attrs: &Attributes) -> Result<Self, ModelError> {
        let group: PositionGroup = position.parse()?;

        let name = attrs
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ModelError::MissingName)?;

        let mut record = Self::new(name, group);
        record.age = attr_u32(attrs, "age");
        record.height = match attrs.get("height") {
            Some(Value::String(text)) => {
                height_to_inches(text).or_else(|| to_int(text).and_then(|v| u32::try_from(v).ok()))
            }
            _ => attr_u32(attrs, "height"),
        };
        record.weight = attr_u32(attrs, "weight");
        record.college = attr_string(attrs, "college");
        record.stats_link = attr_string(attrs, "stats_link");

        let pick = attr_u32(attrs, "pick");
        let career_av = attr_i64(attrs, "career_av");
        if pick.is_some() || career_av.is_some() {
            record.draft = Some(DraftInfo { pick, career_av });
        }

        Ok(record)
    }

    pub fn position(&self) -> PositionGroup {
        self.position
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// Write one stat onto the record's block. Returns `false` if the block
    /// has no such field.
    pub fn set_stat(&mut self, field: &str, value: Option<StatValue>) -> bool {
        self.stats.set(field, value)
    }

    pub fn stat(&self, field: &str) -> Option<StatValue> {
        self.stats.get(field)
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            college: self.college.clone(),
            position: self.position,
        }
    }

    /// File-system friendly identifier, taken from the stats link when
    /// present (`/cfb/players/j-doe-1.html` → `j-doe-1`).
    pub fn slug(&self) -> String {
        let from_link = self.stats_link.as_deref().and_then(|link| {
            link.trim_end_matches('/')
                .rsplit('/')
                .next()
                .map(|last| last.split('.').next().unwrap_or(last).to_string())
                .filter(|s| !s.is_empty())
        });

        from_link.unwrap_or_else(|| {
            self.name
                .to_lowercase()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
                .collect::<String>()
                .split('-')
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("-")
        })
    }
}

fn attr_i64(attrs: &Attributes, key: &str) -> Option<i64> {
    match attrs.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => to_int(s).or_else(|| to_float(s).map(|f| f.round() as i64)),
        _ => None,
    }
}

fn attr_u32(attrs: &Attributes, key: &str) -> Option<u32> {
    attr_i64(attrs, key).and_then(|v| u32::try_from(v).ok())
}

fn attr_string(attrs: &Attributes, key: &str) -> Option<String> {
    attrs
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Deserialization shadow that lets us reject mismatched stat blocks.
#[derive(Deserialize)]
struct RecordRepr {
    name: String,
    position: PositionGroup,
    age: Option<u32>,
    height: Option<u32>,
    weight: Option<u32>,
    college: Option<String>,
    stats_link: Option<String>,
    #[serde(default)]
    draft: Option<DraftInfo>,
    stats: StatBlock,
}

impl TryFrom<RecordRepr> for PlayerRecord {
    type Error = String;

    fn try_from(repr: RecordRepr) -> Result<Self, Self::Error> {
        if repr.name.trim().is_empty() {
            return Err("player name is required".to_string());
        }
        if repr.stats.group() != repr.position {
            return Err(format!(
                "stat block for {} does not match position {}",
                repr.stats.group(),
                repr.position
            ));
        }
        Ok(Self {
            name: repr.name,
            position: repr.position,
            age: repr.age,
            height: repr.height,
            weight: repr.weight,
            college: repr.college,
            stats_link: repr.stats_link,
            draft: repr.draft,
            stats: repr.stats,
        })
    }
}
