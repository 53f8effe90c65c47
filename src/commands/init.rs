use std::io::{self, Write};

use url::Url;

use crate::config::{Config, DEFAULT_BASE_URL};
use crate::error::{JulythonError, Result};

fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Render the config file; empty answers are left out
fn render_config(base_url: &str, session: &str, csrf_token: &str) -> Result<String> {
    let mut content = String::new();

    if !base_url.is_empty() && base_url != DEFAULT_BASE_URL {
        let parsed = Url::parse(base_url).map_err(|_| JulythonError::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(JulythonError::InvalidUrl(base_url.to_string()));
        }
        content.push_str(&format!("base_url = \"{}\"\n", base_url.trim_end_matches('/')));
    }
    if !session.is_empty() {
        content.push_str(&format!("session = \"{session}\"\n"));
    }
    if !csrf_token.is_empty() {
        content.push_str(&format!("csrf_token = \"{csrf_token}\"\n"));
    }

    Ok(content)
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists()
        && !super::confirm(
            &format!(
                "Config file already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?
    {
        println!("Aborted.");
        return Ok(());
    }

    println!("Julython CLI Configuration");
    println!("==========================\n");

    let base_url = prompt(&format!("Site URL [{DEFAULT_BASE_URL}]: "))?;

    println!("\nRead-only commands work without signing in. To manage webhooks, copy the");
    println!("'sessionid' and 'csrftoken' cookies from a signed-in browser session.\n");
    let session = prompt("Session cookie [optional]: ")?;
    let csrf_token = prompt("CSRF token [optional]: ")?;

    let content = render_config(&base_url, &session, &csrf_token)?;

    // Create config directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| JulythonError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, content).map_err(|e| JulythonError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'julython' commands!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_skips_empty_answers() {
        assert_eq!(render_config("", "", "").unwrap(), "");
        assert_eq!(
            render_config("http://localhost:8000/", "s", "").unwrap(),
            "base_url = \"http://localhost:8000\"\nsession = \"s\"\n"
        );
        assert_eq!(
            render_config(DEFAULT_BASE_URL, "", "t").unwrap(),
            "csrf_token = \"t\"\n"
        );
    }

    #[test]
    fn test_render_config_rejects_bad_url() {
        assert!(matches!(
            render_config("not a url", "", ""),
            Err(JulythonError::InvalidUrl(_))
        ));
        assert!(matches!(
            render_config("ftp://example.com", "", ""),
            Err(JulythonError::InvalidUrl(_))
        ));
    }
}
