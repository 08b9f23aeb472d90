//! Page identity used by the cache boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::types::position::PositionGroup;

/// Which kind of page a piece of markup came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKind {
    /// Draft-eligible prospect listing
    Prospects,

    /// Historical draft results
    Draft,

    /// One athlete's stat page
    Player {
        position: PositionGroup,
        slug: String,
    },
}

/// Cache key: `(year, page kind[, position, athlete])`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageKey {
    pub year: i32,
    pub kind: PageKind,
}

impl PageKey {
    pub fn prospects(year: i32) -> Self {
        Self {
            year,
            kind: PageKind::Prospects,
        }
    }

    pub fn draft(year: i32) -> Self {
        Self {
            year,
            kind: PageKind::Draft,
        }
    }

    pub fn player(year: i32, position: PositionGroup, slug: impl Into<String>) -> Self {
        Self {
            year,
            kind: PageKind::Player {
                position,
                slug: slug.into(),
            },
        }
    }

    /// Path of this page relative to a cache root.
    pub fn relative_path(&self) -> PathBuf {
        let year = self.year.to_string();
        match &self.kind {
            PageKind::Prospects => PathBuf::from("pages").join(year).join("prospects.html"),
            PageKind::Draft => PathBuf::from("pages").join(year).join("draft.html"),
            PageKind::Player { position, slug } => PathBuf::from("stat_pages")
                .join(year)
                .join(position.code())
                .join(format!("{slug}.html")),
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PageKind::Prospects => write!(f, "{}/prospects", self.year),
            PageKind::Draft => write!(f, "{}/draft", self.year),
            PageKind::Player { position, slug } => write!(f, "{}/{}/{}", self.year, position, slug),
        }
    }
}
