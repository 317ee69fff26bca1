use std::fmt;
use std::str::FromStr;

/// Statistical category a league-leaders board is ranked by.
///
/// Parses from either the abbreviation (`PTS`) or the lowercase name (`points`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Points,
    Rebounds,
    Assists,
    Blocks,
    Steals,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Points,
        Self::Rebounds,
        Self::Assists,
        Self::Blocks,
        Self::Steals,
    ];

    /// Provider abbreviation, also used as the snapshot key.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Points => "PTS",
            Self::Rebounds => "REB",
            Self::Assists => "AST",
            Self::Blocks => "BLK",
            Self::Steals => "STL",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Rebounds => "rebounds",
            Self::Assists => "assists",
            Self::Blocks => "blocks",
            Self::Steals => "steals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.abbreviation() == s || c.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}
