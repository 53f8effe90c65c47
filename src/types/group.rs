use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::Keyed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Location,
    Team,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location => write!(f, "location"),
            Self::Team => write!(f, "team"),
        }
    }
}

/// A location or team and its running score.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Group {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub total: u64,
    pub url: Option<String>,
}

impl Keyed for Group {
    fn key(&self) -> String {
        self.slug.clone()
    }
}
