use colored::Colorize;
use tabled::Tabled;

use crate::client::JulythonClient;
use crate::collection::{Collection, FetchMode};
use crate::error::Result;
use crate::output::{self, is_json_output};
use crate::resources::BadgesResource;
use crate::types::Badge;

#[derive(Tabled)]
struct BadgeRow {
    #[tabled(rename = "#")]
    id: u64,
    #[tabled(rename = "Badge")]
    title: String,
    #[tabled(rename = "Details")]
    subtitle: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

impl From<&Badge> for BadgeRow {
    fn from(badge: &Badge) -> Self {
        let title = if badge.awarded && !is_json_output() {
            badge.title.green().bold().to_string()
        } else {
            badge.title.clone()
        };
        Self {
            id: badge.id,
            title,
            subtitle: badge.subtitle.clone().unwrap_or_default(),
            progress: badge.progress(),
        }
    }
}

pub async fn list(client: &JulythonClient, user: &str) -> Result<()> {
    let mut badges = Collection::new(BadgesResource {
        user: user.to_string(),
    });
    badges.fetch(client, FetchMode::Replace).await?;

    if badges.is_empty() {
        output::print_message(&format!("{user} has no badges yet"));
        return Ok(());
    }

    output::print_table(badges.items(), BadgeRow::from, |b| {
        format!("{} {}", b.title, b.progress())
    });

    Ok(())
}
