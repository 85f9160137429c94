//! Configuration validation

use super::schema::Config;
use crate::error::{Result, ValidationError};
use hyper::header::HeaderValue;
use std::net::SocketAddr;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate entire configuration
    pub fn validate(config: &Config) -> Result<()> {
        Self::validate_server(config)?;
        Self::validate_headers(config)?;
        Self::validate_domains(&config.allowlist.domains)?;
        Ok(())
    }

    fn validate_server(config: &Config) -> Result<()> {
        if config.server.listen.parse::<SocketAddr>().is_err() {
            return Err(ValidationError::InvalidListen {
                addr: config.server.listen.clone(),
            }
            .into());
        }

        if !config.server.route.starts_with('/') {
            return Err(ValidationError::InvalidRoute {
                route: config.server.route.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Every configured header must be sendable as-is
    fn validate_headers(config: &Config) -> Result<()> {
        let fields = [
            ("upstream.user_agent", &config.upstream.user_agent),
            ("upstream.referer", &config.upstream.referer),
            ("response.cache_control", &config.response.cache_control),
            ("response.default_content_type", &config.response.default_content_type),
        ];

        for (field, value) in fields {
            if HeaderValue::from_str(value).is_err() {
                return Err(ValidationError::InvalidHeaderValue {
                    field,
                    value: value.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Domains are plain lowercase hostnames; wildcards are implied by the matcher.
    /// Target hosts are lowercased by URL parsing, so an uppercase entry could
    /// never match.
    fn validate_domains(domains: &[String]) -> Result<()> {
        if domains.is_empty() {
            return Err(ValidationError::EmptyAllowlist.into());
        }

        for domain in domains {
            let invalid = domain.is_empty()
                || domain.starts_with('.')
                || domain.ends_with('.')
                || domain.chars().any(|c| {
                    matches!(c, '*' | '?' | '/' | ':')
                        || c.is_uppercase()
                        || c.is_whitespace()
                        || c.is_control()
                });

            if invalid {
                return Err(ValidationError::InvalidDomain {
                    domain: domain.clone(),
                }
                .into());
            }
        }

        Ok(())
    }
}
