//! Error types for proxy operations

use hyper::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProxyError>;

/// Errors raised while configuring or running the proxy server
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load config from {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Allowlist must contain at least one domain")]
    EmptyAllowlist,

    #[error("Invalid allowlist domain: {domain:?}")]
    InvalidDomain { domain: String },

    #[error("Invalid route {route:?}: must start with '/'")]
    InvalidRoute { route: String },

    #[error("Invalid listen address: {addr}")]
    InvalidListen { addr: String },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidHeaderValue { field: &'static str, value: String },
}

/// Per-request failures, each surfaced to the caller as a JSON error body
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing url parameter")]
    MissingParameter,

    #[error("invalid URL")]
    InvalidUrl(#[source] url::ParseError),

    #[error("target domain not allowed")]
    ForbiddenHost { host: String },

    #[error("failed to fetch audio")]
    UpstreamStatus(StatusCode),

    #[error("proxy request failed")]
    Unexpected(String),
}

impl RequestError {
    /// Status code sent back to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MissingParameter | RequestError::InvalidUrl(_) => {
                StatusCode::BAD_REQUEST
            }
            RequestError::ForbiddenHost { .. } => StatusCode::FORBIDDEN,
            RequestError::UpstreamStatus(status) => *status,
            RequestError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent back to the caller
    pub fn body(&self) -> serde_json::Value {
        match self {
            RequestError::Unexpected(details) => serde_json::json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Unexpected(e.to_string())
    }
}
