use serde::{Deserialize, Serialize};

use crate::collection::Keyed;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Commit {
    pub hash: String,
    pub author: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    pub url: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub languages: Vec<String>,
    pub project: Option<String>,
    pub user: Option<String>,
}

impl Commit {
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }

    /// Best display name for whoever made the commit
    pub fn who(&self) -> &str {
        self.name
            .as_deref()
            .or(self.author.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("-")
    }
}

impl Keyed for Commit {
    fn key(&self) -> String {
        self.hash.clone()
    }
}
