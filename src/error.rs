use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JulythonError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Envelope(String),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No session found. Set JULYTHON_SESSION env var or add session to ~/.config/julython/config.toml"
    )]
    MissingSession,

    #[error(
        "No CSRF token found. Set JULYTHON_CSRF_TOKEN env var or add csrf_token to ~/.config/julython/config.toml"
    )]
    MissingCsrfToken,

    #[error("Invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Webhook {hook_id} not found on {repo}")]
    HookNotFound { hook_id: u64, repo: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, JulythonError>;
