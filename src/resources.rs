//! Endpoint definitions for every collection the CLI lists.

use crate::client::PageSource;
use crate::collection::{Collection, Envelope, FetchMode, Resource};
use crate::error::Result;
use crate::types::{Badge, Board, Commit, Group, GroupKind, Hook, Repository, Tier};

/// Separator for multi-valued filters, matching what the server splits on.
pub const LIST_DELIMITER: &str = ";";

#[derive(Default, Clone)]
pub struct CommitsResource {
    pub project: Option<String>,
    pub user: Option<String>,
    pub languages: Vec<String>,
}

impl Resource for CommitsResource {
    type Item = Commit;

    fn path(&self) -> String {
        "/api/v1/commit/".to_string()
    }

    fn default_limit(&self) -> u64 {
        20
    }

    fn filters(&self) -> Vec<(&'static str, String)> {
        let mut filters = Vec::new();
        if let Some(project) = &self.project {
            filters.push(("project", project.clone()));
        }
        if let Some(user) = &self.user {
            filters.push(("user", user.clone()));
        }
        if !self.languages.is_empty() {
            filters.push(("languages", self.languages.join(LIST_DELIMITER)));
        }
        filters
    }
}

pub struct BoardResource {
    pub tier: Tier,
}

impl Resource for BoardResource {
    type Item = Board;

    fn path(&self) -> String {
        format!("/api/v1/{}board/", self.tier)
    }

    fn default_limit(&self) -> u64 {
        10
    }
}

/// The signed-in user's GitHub repositories, proxied by the site.
pub struct RepositoriesResource;

impl Resource for RepositoriesResource {
    type Item = Repository;

    fn path(&self) -> String {
        "/api/v1/github/repos/".to_string()
    }

    fn default_limit(&self) -> u64 {
        100
    }

    fn envelope(&self) -> Envelope {
        Envelope::BareArray
    }
}

/// Webhooks of one repository; the path comes from the repository itself.
pub struct HooksResource {
    path: String,
}

impl HooksResource {
    pub fn for_repository(repository: &Repository) -> Self {
        Self {
            path: repository.hooks_path(),
        }
    }
}

impl Resource for HooksResource {
    type Item = Hook;

    fn path(&self) -> String {
        self.path.clone()
    }

    fn default_limit(&self) -> u64 {
        30
    }

    fn envelope(&self) -> Envelope {
        Envelope::BareArray
    }
}

pub struct BadgesResource {
    pub user: String,
}

impl Resource for BadgesResource {
    type Item = Badge;

    fn path(&self) -> String {
        "/api/v1/badges/".to_string()
    }

    fn default_limit(&self) -> u64 {
        100
    }

    fn envelope(&self) -> Envelope {
        Envelope::Badges
    }

    fn filters(&self) -> Vec<(&'static str, String)> {
        vec![("user", self.user.clone())]
    }
}

pub struct GroupResource {
    pub kind: GroupKind,
    pub search: Option<String>,
}

impl GroupResource {
    pub fn new(kind: GroupKind) -> Self {
        Self { kind, search: None }
    }
}

impl Resource for GroupResource {
    type Item = Group;

    fn path(&self) -> String {
        format!("/api/v1/{}/", self.kind)
    }

    fn default_limit(&self) -> u64 {
        20
    }

    fn filters(&self) -> Vec<(&'static str, String)> {
        self.search
            .iter()
            .map(|q| ("name__icontains", q.clone()))
            .collect()
    }
}

impl Collection<GroupResource> {
    /// Start a new search: cursor and total go back to zero, the search term
    /// is set and the first page of matches is fetched. Returns the names
    /// held *before* the search, not the fetched matches.
    pub async fn filter<S: PageSource>(&mut self, source: &S, query: &str) -> Result<Vec<String>> {
        let names = self.items().iter().map(|g| g.name.clone()).collect();
        let query = query.trim();
        self.resource_mut().search = (!query.is_empty()).then(|| query.to_string());
        self.reset();
        self.fetch(source, FetchMode::Add).await?;
        Ok(names)
    }
}
