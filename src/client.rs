use reqwest::header::{ACCEPT, COOKIE, REFERER};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{JulythonError, Result};

const CSRF_HEADER: &str = "X-CSRFToken";

/// Anything that can answer a GET with a JSON body.
///
/// Collections only ever read through this trait, so tests can feed them
/// canned pages without a server.
pub trait PageSource {
    async fn get_json(&self, path: &str, query: &str) -> Result<Value>;
}

pub struct JulythonClient {
    http: Client,
    base_url: String,
    session: Option<String>,
    csrf_token: Option<String>,
}

impl JulythonClient {
    pub fn new(base_url: String, session: Option<String>, csrf_token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            csrf_token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url(), config.session(), config.csrf_token())
    }

    /// Resolve an API path against the base URL; absolute URLs pass through
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build a request with auth attached. Unsafe methods always carry the
    /// CSRF token, safe ones never do.
    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");

        let mut cookies = Vec::new();
        if let Some(session) = &self.session {
            cookies.push(format!("sessionid={session}"));
        }

        if !method.is_safe() {
            let token = self
                .csrf_token
                .as_deref()
                .ok_or(JulythonError::MissingCsrfToken)?;
            cookies.push(format!("csrftoken={token}"));
            builder = builder
                .header(CSRF_HEADER, token)
                .header(REFERER, format!("{}/", self.base_url));
        }

        if !cookies.is_empty() {
            builder = builder.header(COOKIE, cookies.join("; "));
        }

        Ok(builder)
    }

    async fn check(response: Response) -> Result<Value> {
        if !response.status().is_success() {
            return Err(JulythonError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.url(path);
        debug!(%url, "POST");

        if self.session.is_none() {
            return Err(JulythonError::MissingSession);
        }

        let response = self.request(Method::POST, &url)?.json(body).send().await?;
        Self::check(response).await
    }
}

impl PageSource for JulythonClient {
    async fn get_json(&self, path: &str, query: &str) -> Result<Value> {
        let mut url = self.url(path);
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(query);
        }
        debug!(%url, "GET");

        let response = self.request(Method::GET, &url)?.send().await?;
        Self::check(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(csrf: Option<&str>) -> JulythonClient {
        JulythonClient::new(
            "http://localhost:8000/".to_string(),
            Some("sess".to_string()),
            csrf.map(String::from),
        )
    }

    #[test]
    fn test_url_resolution() {
        let c = client(None);
        assert_eq!(c.url("/api/v1/commit/"), "http://localhost:8000/api/v1/commit/");
        assert_eq!(c.url("api/v1/team/"), "http://localhost:8000/api/v1/team/");
        assert_eq!(
            c.url("https://other.example/hooks/"),
            "https://other.example/hooks/"
        );
    }

    #[test]
    fn test_unsafe_methods_carry_csrf_token() {
        let c = client(Some("tok"));
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let request = c.request(method, &c.url("/x/")).unwrap().build().unwrap();
            assert_eq!(request.headers().get(CSRF_HEADER).unwrap(), "tok");
            let cookie = request.headers().get(COOKIE).unwrap().to_str().unwrap();
            assert!(cookie.contains("csrftoken=tok"));
            assert!(cookie.contains("sessionid=sess"));
        }
    }

    #[test]
    fn test_safe_methods_skip_csrf_token() {
        let c = client(Some("tok"));
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            let request = c.request(method, &c.url("/x/")).unwrap().build().unwrap();
            assert!(request.headers().get(CSRF_HEADER).is_none());
            assert_eq!(request.headers().get(COOKIE).unwrap(), "sessionid=sess");
        }
    }

    #[test]
    fn test_unsafe_method_without_token_fails() {
        let c = client(None);
        let result = c.request(Method::POST, &c.url("/x/"));
        assert!(matches!(result, Err(JulythonError::MissingCsrfToken)));
    }
}
