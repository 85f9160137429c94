//! Configuration management for proxy

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::ConfigLoader;
pub use schema::{AllowlistConfig, Config, ResponseConfig, ServerConfig, UpstreamConfig};
pub use validator::ConfigValidator;
