use tabled::Tabled;

use crate::cli::CommitListArgs;
use crate::client::JulythonClient;
use crate::collection::{Collection, FetchMode};
use crate::config::Config;
use crate::error::Result;
use crate::feed::{Feed, ScrollPosition};
use crate::output::{self, first_line, format_relative, truncate};
use crate::resources::CommitsResource;
use crate::types::Commit;

#[derive(Tabled)]
struct CommitRow {
    #[tabled(rename = "Hash")]
    hash: String,
    #[tabled(rename = "Who")]
    who: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Languages")]
    languages: String,
    #[tabled(rename = "When")]
    when: String,
}

impl From<&Commit> for CommitRow {
    fn from(commit: &Commit) -> Self {
        Self {
            hash: commit.short_hash().to_string(),
            who: truncate(commit.who(), 20),
            message: truncate(first_line(&commit.message), 50),
            languages: commit.languages.join(", "),
            when: format_relative(&commit.timestamp),
        }
    }
}

fn compact(commit: &Commit) -> String {
    format!(
        "{} {} {}",
        commit.short_hash(),
        commit.who(),
        first_line(&commit.message)
    )
}

fn print_commits(commits: &[Commit]) {
    output::print_table(commits, CommitRow::from, compact);
}

pub async fn list(client: &JulythonClient, config: &Config, args: CommitListArgs) -> Result<()> {
    let resource = CommitsResource {
        project: args.project,
        user: args.user,
        languages: args.languages,
    };
    let collection = match config.resolve_limit(args.limit) {
        Some(limit) => Collection::with_limit(resource, u64::from(limit)),
        None => Collection::new(resource),
    };

    if args.more {
        return page_through(client, Feed::new(collection).with_threshold(0)).await;
    }

    let mut collection = collection;
    if args.all {
        collection.fetch_all(client, None).await?;
    } else {
        collection.fetch(client, FetchMode::Add).await?;
    }

    if collection.is_empty() {
        output::print_message("No commits found");
        return Ok(());
    }

    print_commits(collection.items());

    if !args.all && collection.has_more() {
        output::print_message(&format!(
            "Showing {} of {} commits (use --all or --more to see the rest)",
            collection.len(),
            collection.total()
        ));
    }

    Ok(())
}

/// Print a page at a time, asking before pulling in the next one
async fn page_through(client: &JulythonClient, mut feed: Feed<CommitsResource>) -> Result<()> {
    let mut held = feed.subscribe();
    let mut printed = 0;

    feed.load(client, FetchMode::Add).await?;
    loop {
        let count = *held.borrow_and_update();
        if count > printed {
            print_commits(&feed.items()[printed..count]);
            printed = count;
        }

        if !feed.has_more() || !super::confirm("Load more?", true)? {
            break;
        }

        if !feed.scrolled(client, ScrollPosition::at_end(printed, printed)).await? {
            break;
        }
    }

    if printed == 0 {
        output::print_message("No commits found");
    }

    Ok(())
}
