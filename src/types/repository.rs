use serde::{Deserialize, Serialize};

use crate::collection::Keyed;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub language: Option<String>,
    /// Proxy URL of this repository's webhook listing
    pub hooks_url: Option<String>,
}

impl Repository {
    pub fn hooks_path(&self) -> String {
        self.hooks_url
            .clone()
            .unwrap_or_else(|| format!("/api/v1/github/repos/{}/hooks/", self.full_name))
    }
}

impl Keyed for Repository {
    fn key(&self) -> String {
        self.id.to_string()
    }
}
