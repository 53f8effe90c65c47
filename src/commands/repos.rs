use tabled::Tabled;

use crate::client::{JulythonClient, PageSource};
use crate::collection::{Collection, FetchMode};
use crate::error::{JulythonError, Result};
use crate::output::{self, truncate};
use crate::resources::RepositoriesResource;
use crate::types::Repository;

#[derive(Tabled)]
struct RepositoryRow {
    #[tabled(rename = "Repository")]
    full_name: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Repository> for RepositoryRow {
    fn from(repo: &Repository) -> Self {
        Self {
            full_name: repo.full_name.clone(),
            language: repo.language.clone().unwrap_or_default(),
            description: truncate(repo.description.as_deref().unwrap_or(""), 50),
        }
    }
}

pub async fn list(client: &JulythonClient, all: bool) -> Result<()> {
    let mut repos = Collection::new(RepositoriesResource);

    if all {
        repos.fetch_all(client, None).await?;
    } else {
        repos.fetch(client, FetchMode::Add).await?;
    }

    if repos.is_empty() {
        output::print_message("No repositories found");
        return Ok(());
    }

    output::print_table(repos.items(), RepositoryRow::from, |r| r.full_name.clone());

    if !all && repos.has_more() {
        output::print_message("More repositories available (use --all)");
    }

    Ok(())
}

/// Page through the repository listing until `full_name` turns up
pub async fn find_repository<S: PageSource>(source: &S, full_name: &str) -> Result<Repository> {
    let mut repos = Collection::new(RepositoriesResource);
    let wanted = full_name.to_lowercase();

    loop {
        let seen = repos.len();
        repos.fetch(source, FetchMode::Add).await?;

        if let Some(repo) = repos.items()[seen..]
            .iter()
            .find(|r| r.full_name.to_lowercase() == wanted)
        {
            return Ok(repo.clone());
        }

        if !repos.has_more() || repos.len() == seen {
            return Err(JulythonError::RepositoryNotFound(full_name.to_string()));
        }
    }
}
