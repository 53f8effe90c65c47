use tabled::Tabled;
use tracing::debug;

use crate::cli::GroupListArgs;
use crate::client::JulythonClient;
use crate::collection::{Collection, FetchMode};
use crate::config::Config;
use crate::error::Result;
use crate::output::{self, points_colored};
use crate::resources::GroupResource;
use crate::types::{Group, GroupKind};

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Points")]
    total: String,
    #[tabled(rename = "Slug")]
    slug: String,
}

impl From<&Group> for GroupRow {
    fn from(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            total: points_colored(group.total),
            slug: group.slug.clone(),
        }
    }
}

pub async fn list(
    client: &JulythonClient,
    config: &Config,
    kind: GroupKind,
    args: GroupListArgs,
) -> Result<()> {
    let resource = GroupResource::new(kind);
    let mut groups = match config.resolve_limit(args.limit) {
        Some(limit) => Collection::with_limit(resource, u64::from(limit)),
        None => Collection::new(resource),
    };

    match args.search.as_deref() {
        Some(query) => {
            // the returned names predate the search; print the fetched matches
            let previous = groups.filter(client, query).await?;
            debug!(%kind, query, discarded = previous.len(), "searched groups");
        }
        None => {
            groups.fetch(client, FetchMode::Replace).await?;
        }
    }

    if groups.is_empty() {
        output::print_message(&format!("No {kind}s found"));
        return Ok(());
    }

    output::print_table(groups.items(), GroupRow::from, |g| {
        format!("{} {}", g.name, g.total)
    });

    if groups.has_more() {
        output::print_message(&format!(
            "Showing {} of {} {kind}s",
            groups.len(),
            groups.total()
        ));
    }

    Ok(())
}
