use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::collection::Keyed;

/// Leaderboard tiers, split by project size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Large,
    Medium,
    Small,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Large => "large",
            Tier::Medium => "medium",
            Tier::Small => "small",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One project's standing on a board.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub id: u64,
    pub name: String,
    pub slug: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub total: u64,
}

impl Keyed for Board {
    fn key(&self) -> String {
        self.id.to_string()
    }
}
