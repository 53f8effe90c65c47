use regex::Regex;
use serde::Serialize;
use tabled::Tabled;

use crate::client::JulythonClient;
use crate::collection::Collection;
use crate::commands::repos::find_repository;
use crate::error::{JulythonError, Result};
use crate::output::{self, active_colored, format_date};
use crate::resources::HooksResource;
use crate::types::{Hook, Repository};

#[derive(Tabled)]
struct HookRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Events")]
    events: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Hook> for HookRow {
    fn from(hook: &Hook) -> Self {
        Self {
            id: hook.id,
            name: hook.name.clone(),
            state: active_colored(hook.active),
            url: hook.config.url.clone().unwrap_or_default(),
            events: hook.events.join(", "),
            updated: hook.updated_at.as_deref().map(format_date).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum HookAction {
    Add,
    Test { hook_id: u64 },
}

/// Check an owner/name slug before asking the server about it
fn validate_slug(slug: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$")
        .map_err(|e| JulythonError::InvalidRepository(e.to_string()))?;

    if re.is_match(slug) {
        Ok(())
    } else {
        Err(JulythonError::InvalidRepository(slug.to_string()))
    }
}

async fn resolve(client: &JulythonClient, slug: &str) -> Result<Repository> {
    validate_slug(slug)?;
    find_repository(client, slug).await
}

pub async fn list(client: &JulythonClient, slug: &str) -> Result<()> {
    let repo = resolve(client, slug).await?;
    let mut hooks = Collection::new(HooksResource::for_repository(&repo));
    hooks.fetch_all(client, None).await?;

    if hooks.is_empty() {
        output::print_message(&format!("No webhooks on {}", repo.full_name));
        return Ok(());
    }

    output::print_table(hooks.items(), HookRow::from, |h| {
        format!("{} {} {}", h.id, h.name, if h.active { "active" } else { "inactive" })
    });

    Ok(())
}

pub async fn add(client: &JulythonClient, slug: &str) -> Result<()> {
    let repo = resolve(client, slug).await?;
    client.post_json(&repo.hooks_path(), &HookAction::Add).await?;

    output::print_message(&format!("Added webhook to {}", repo.full_name));
    Ok(())
}

pub async fn test(client: &JulythonClient, slug: &str, hook_id: u64) -> Result<()> {
    let repo = resolve(client, slug).await?;

    let mut hooks = Collection::new(HooksResource::for_repository(&repo));
    hooks.fetch_all(client, None).await?;

    let Some(hook) = hooks.items().iter().find(|h| h.id == hook_id) else {
        return Err(JulythonError::HookNotFound {
            hook_id,
            repo: repo.full_name,
        });
    };

    client
        .post_json(&repo.hooks_path(), &HookAction::Test { hook_id })
        .await?;

    output::print_message(&format!(
        "Sent test delivery for hook {} on {}",
        hook.id, repo.full_name
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("julython/july").is_ok());
        assert!(validate_slug("some-org/repo.name_2").is_ok());
        assert!(validate_slug("july").is_err());
        assert!(validate_slug("a/b/c").is_err());
        assert!(validate_slug("owner/").is_err());
        assert!(validate_slug("own er/repo").is_err());
    }

    #[test]
    fn test_hook_action_bodies() {
        assert_eq!(
            serde_json::to_value(HookAction::Add).unwrap(),
            json!({ "action": "add" })
        );
        assert_eq!(
            serde_json::to_value(HookAction::Test { hook_id: 12 }).unwrap(),
            json!({ "action": "test", "hook_id": 12 })
        );
    }
}
