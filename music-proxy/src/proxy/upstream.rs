//! Outbound client for the CDN requests

use crate::config::UpstreamConfig;
use crate::error::{RequestError, Result};
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use url::Url;

/// HTTP client that fetches targets with the spoofed browser headers
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    user_agent: String,
    referer: String,
}

impl UpstreamClient {
    /// Build a client from configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Self::builder(config).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Client builder preloaded with the configured redirect policy
    ///
    /// Callers may adjust it (e.g. DNS overrides) before passing the built
    /// client to [`UpstreamClient::with_client`].
    pub fn builder(config: &UpstreamConfig) -> reqwest::ClientBuilder {
        reqwest::Client::builder().redirect(Policy::limited(config.max_redirects))
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            user_agent: config.user_agent.clone(),
            referer: config.referer.clone(),
        }
    }

    /// Issue the GET for `url`
    ///
    /// Resolves once the response head is received; the body is left
    /// unread so it can be streamed to the caller.
    pub async fn fetch(&self, url: &Url) -> std::result::Result<reqwest::Response, RequestError> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(REFERER, &self.referer)
            .send()
            .await?;

        Ok(response)
    }
}
