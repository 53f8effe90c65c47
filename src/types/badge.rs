use serde::{Deserialize, Serialize};

use crate::collection::Keyed;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Badge {
    /// Assigned client-side in listing order
    pub id: u64,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    pub count: Option<u64>,
    pub total: Option<u64>,
    #[serde(default)]
    pub awarded: bool,
}

impl Badge {
    pub fn progress(&self) -> String {
        match (self.count, self.total) {
            (Some(count), Some(total)) => format!("{count}/{total}"),
            (Some(count), None) => count.to_string(),
            _ => String::new(),
        }
    }
}

impl Keyed for Badge {
    fn key(&self) -> String {
        self.id.to_string()
    }
}
