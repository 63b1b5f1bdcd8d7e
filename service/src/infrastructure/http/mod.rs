use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::{Client, RequestBuilder};
use url::Url;

pub use articles::HttpArticleService;
pub use auth::HttpAuthService;

mod api;
mod articles;
mod auth;
pub mod dto;

/// Configuration for the HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig<'a> {
    pub base_url: &'a str,
    pub timeout: Duration,
}

/// Shared HTTP client for both servers. The cookie store keeps the admin
/// session between requests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: HttpClientConfig<'_>) -> anyhow::Result<Self> {
        let base_url = Url::parse(config.base_url)
            .with_context(|| format!("invalid api base url '{}'", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("api base url '{}' cannot carry a path", config.base_url));
        }
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .context("failed to build http client")?;

        Ok(Self { client, base_url })
    }

    /// Full URL of an endpoint below the api base. Each segment is percent
    /// encoded, so slugs and ids cannot escape their path segment.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // base urls that cannot carry a path are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.client.get(self.url(segments))
    }

    pub(crate) fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.client.post(self.url(segments))
    }

    pub(crate) fn put(&self, segments: &[&str]) -> RequestBuilder {
        self.client.put(self.url(segments))
    }

    pub(crate) fn delete(&self, segments: &[&str]) -> RequestBuilder {
        self.client.delete(self.url(segments))
    }
}
