use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{JulythonError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.julython.org";

#[derive(Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub session: Option<String>,
    pub csrf_token: Option<String>,
    pub default_limit: Option<u32>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| JulythonError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| JulythonError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "julython")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(JulythonError::NoConfigDir)
    }

    /// Base URL of the Julython site, env var first, trailing slash stripped
    pub fn base_url(&self) -> String {
        std::env::var("JULYTHON_URL")
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Session cookie, optional for read-only commands
    pub fn session(&self) -> Option<String> {
        std::env::var("JULYTHON_SESSION")
            .ok()
            .or_else(|| self.session.clone())
    }

    pub fn csrf_token(&self) -> Option<String> {
        std::env::var("JULYTHON_CSRF_TOKEN")
            .ok()
            .or_else(|| self.csrf_token.clone())
    }

    /// Get page size, preferring explicit argument over default
    pub fn resolve_limit(&self, explicit: Option<u32>) -> Option<u32> {
        explicit.or(self.default_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
base_url = "http://localhost:8000/"
session = "abc"
csrf_token = "tok"
default_limit = 50
"#,
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000/"));
        assert_eq!(config.session.as_deref(), Some("abc"));
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
        assert_eq!(config.default_limit, Some(50));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.base_url.is_none());
        assert!(config.default_limit.is_none());
    }

    #[test]
    fn test_resolve_limit_prefers_explicit() {
        let config = Config {
            default_limit: Some(40),
            ..Default::default()
        };
        assert_eq!(config.resolve_limit(Some(5)), Some(5));
        assert_eq!(config.resolve_limit(None), Some(40));
        assert_eq!(Config::default().resolve_limit(None), None);
    }
}
