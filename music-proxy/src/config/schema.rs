//! Configuration schema types

use crate::filter::{Allowlist, DEFAULT_DOMAINS};
use serde::{Deserialize, Serialize};

/// Complete proxy configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub response: ResponseConfig,
    #[serde(default)]
    pub allowlist: AllowlistConfig,
}

/// Listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Path the proxy endpoint is mounted on
    #[serde(default = "default_route")]
    pub route: String,
}

fn default_listen() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_route() -> String {
    "/api/music/proxy".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            route: default_route(),
        }
    }
}

/// Headers sent to the CDN and client behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Sent to every target, including non-Kuwo CDNs
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_referer() -> String {
    "http://www.kuwo.cn/".to_string()
}

fn default_max_redirects() -> usize {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            referer: default_referer(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Fixed headers on successful responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponseConfig {
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
    /// Used when the CDN omits Content-Type
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

fn default_cache_control() -> String {
    "public, max-age=3600".to_string()
}

fn default_content_type() -> String {
    "audio/mpeg".to_string()
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            cache_control: default_cache_control(),
            default_content_type: default_content_type(),
        }
    }
}

/// Permitted target domains
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllowlistConfig {
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
}

fn default_domains() -> Vec<String> {
    DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect()
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            domains: default_domains(),
        }
    }
}

impl AllowlistConfig {
    pub fn to_allowlist(&self) -> Allowlist {
        Allowlist::new(self.domains.iter().cloned())
    }
}
