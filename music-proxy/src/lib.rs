//! Streaming HTTP proxy for allowlisted music CDNs

pub mod config;
pub mod error;
pub mod filter;
pub mod proxy;

// Re-export commonly used types
pub use config::{Config, ConfigLoader, ConfigValidator};
pub use error::{ProxyError, RequestError, Result, ValidationError};
pub use filter::Allowlist;
pub use proxy::{ProxyHandler, ProxyServer, ProxyServerConfig, UpstreamClient};
