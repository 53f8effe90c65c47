use serde::{Deserialize, Serialize};

use crate::collection::Keyed;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Hook {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub config: HookConfig,
    pub updated_at: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct HookConfig {
    pub url: Option<String>,
    pub content_type: Option<String>,
}

impl Keyed for Hook {
    fn key(&self) -> String {
        self.id.to_string()
    }
}
