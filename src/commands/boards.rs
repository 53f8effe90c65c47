use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::client::JulythonClient;
use crate::collection::{Collection, FetchMode};
use crate::config::Config;
use crate::error::Result;
use crate::feed::Feed;
use crate::output::{self, points_colored, truncate};
use crate::resources::BoardResource;
use crate::types::{Board, Tier};

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Project")]
    name: String,
    #[tabled(rename = "Points")]
    points: String,
    #[tabled(rename = "Commits")]
    total: u64,
}

#[derive(Serialize)]
struct TierBoard<'a> {
    tier: Tier,
    total: u64,
    projects: &'a [Board],
}

fn new_feed(tier: Tier, limit: Option<u32>) -> Feed<BoardResource> {
    let resource = BoardResource { tier };
    let collection = match limit {
        Some(limit) => Collection::with_limit(resource, u64::from(limit)),
        None => Collection::new(resource),
    };
    Feed::new(collection)
}

/// Fetch all three tiers at once; each keeps its own cursor.
pub async fn list(client: &JulythonClient, config: &Config, limit: Option<u32>) -> Result<()> {
    let limit = config.resolve_limit(limit);
    let mut large = new_feed(Tier::Large, limit);
    let mut medium = new_feed(Tier::Medium, limit);
    let mut small = new_feed(Tier::Small, limit);

    let (l, m, s) = tokio::join!(
        large.load(client, FetchMode::Add),
        medium.load(client, FetchMode::Add),
        small.load(client, FetchMode::Add),
    );
    l?;
    m?;
    s?;

    let feeds = [&large, &medium, &small];

    if output::is_json_output() {
        let boards: Vec<TierBoard> = feeds
            .iter()
            .map(|feed| TierBoard {
                tier: feed.collection().resource().tier,
                total: feed.collection().total(),
                projects: feed.items(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&boards).unwrap_or_default());
        return Ok(());
    }

    for feed in feeds {
        let tier = feed.collection().resource().tier;
        if !output::is_quiet() {
            println!(
                "{} {}",
                format!("{} projects", capitalize(tier.as_str())).bold(),
                format!("({} total)", feed.collection().total()).bright_black()
            );
        }

        let projects = feed.items();
        if projects.is_empty() {
            output::print_message("No projects yet");
            continue;
        }

        let ranked: Vec<(usize, &Board)> = projects.iter().enumerate().collect();
        output::print_table(
            &ranked,
            |(i, board)| BoardRow {
                rank: i + 1,
                name: truncate(&board.name, 40),
                points: points_colored(board.points),
                total: board.total,
            },
            |(i, board)| format!("{} {} {}", i + 1, board.name, board.points),
        );
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("large"), "Large");
        assert_eq!(capitalize(""), "");
    }
}
