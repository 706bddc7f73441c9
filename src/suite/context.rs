//! Per-step request context
//!
//! Each step receives a fresh [`RequestContext`] built from the suite's base
//! URL and token at the moment the step starts. The context owns its copies,
//! so nothing a step does can alias the suite's configuration.

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::common::{excerpt, join_url, Error, Result};

/// Configuration injected into every step
#[derive(Debug, Clone)]
pub struct RequestContext {
    client: reqwest::Client,
    base_url: Option<Url>,
    token: String,
}

impl RequestContext {
    pub fn new(client: reqwest::Client, base_url: Option<Url>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            token: token.into(),
        }
    }

    /// The suite's base URL at the time the step started
    pub fn base_url(&self) -> Result<&Url> {
        self.base_url.as_ref().ok_or(Error::MissingBaseUrl)
    }

    /// Bearer token; empty when the suite is unauthenticated
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Resolve `path` against the base URL
    pub fn url(&self, path: &str) -> Result<Url> {
        join_url(self.base_url()?, path)
    }

    /// Start a request to `path`, authenticated when a token is present
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let builder = self.client.request(method, self.url(path)?);
        if self.token.is_empty() {
            Ok(builder)
        } else {
            Ok(builder.bearer_auth(&self.token))
        }
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::DELETE, path)
    }
}

/// Fail with a `TestAssertion` unless the response has the expected status
pub async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    let actual = response.status();
    if actual == expected {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    Err(Error::TestAssertion(format!(
        "{}: expected status {}, got {}. Body: '{}'",
        url,
        expected,
        actual,
        excerpt(&body)
    )))
}

/// Decode a JSON response body, failing with a `TestAssertion` on mismatch
pub async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        Error::TestAssertion(format!(
            "Failed to parse response body: {}. Body: '{}'",
            e,
            excerpt(&body)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn context(base: Option<&str>, token: &str) -> RequestContext {
        RequestContext::new(
            reqwest::Client::new(),
            base.map(|b| Url::parse(b).unwrap()),
            token,
        )
    }

    #[test]
    fn test_url_joins_base() {
        let ctx = context(Some("http://api.example.com/v2"), "");
        assert_eq!(
            ctx.url("/users/7").unwrap().as_str(),
            "http://api.example.com/v2/users/7"
        );
    }

    #[test]
    fn test_missing_base_url() {
        let ctx = context(None, "tok");
        assert!(matches!(ctx.base_url(), Err(Error::MissingBaseUrl)));
        assert!(matches!(ctx.get("/x"), Err(Error::MissingBaseUrl)));
    }

    #[test]
    fn test_bearer_token_attached_when_present() {
        let ctx = context(Some("http://api.example.com"), "tok123");
        let request = ctx.delete("/items/1").unwrap().build().unwrap();
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer tok123"
        );
    }

    #[test]
    fn test_no_authorization_without_token() {
        let ctx = context(Some("http://api.example.com"), "");
        let request = ctx.get("/health").unwrap().build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.url().as_str(), "http://api.example.com/health");
    }
}
