//! Request handling for the music proxy endpoint

use super::response::{self, ProxyBody};
use super::upstream::UpstreamClient;
use crate::config::{Config, ResponseConfig};
use crate::error::{RequestError, Result};
use crate::filter::Allowlist;
use hyper::header::{
    HeaderMap, HeaderValue, ACCEPT_RANGES, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
    CONTENT_LENGTH, CONTENT_TYPE, RANGE,
};
use hyper::{Request, Response};
use tracing::{debug, error, warn};
use url::Url;

/// Query parameter carrying the target URL
const URL_PARAM: &str = "url";

/// Stateless handler: validate, check the allowlist, forward, relay
#[derive(Debug, Clone)]
pub struct ProxyHandler {
    allowlist: Allowlist,
    upstream: UpstreamClient,
    cache_control: HeaderValue,
    default_content_type: HeaderValue,
}

impl ProxyHandler {
    pub fn new(
        allowlist: Allowlist,
        upstream: UpstreamClient,
        response: &ResponseConfig,
    ) -> Result<Self> {
        Ok(Self {
            allowlist,
            upstream,
            cache_control: header_value("response.cache_control", &response.cache_control)?,
            default_content_type: header_value(
                "response.default_content_type",
                &response.default_content_type,
            )?,
        })
    }

    /// Build a handler with its own upstream client
    pub fn from_config(config: &Config) -> Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        Self::new(config.allowlist.to_allowlist(), upstream, &config.response)
    }

    /// Handle one proxy request
    ///
    /// Every failure is turned into a JSON error response; nothing is retried.
    pub async fn handle<B>(&self, req: &Request<B>) -> Response<ProxyBody> {
        match self.proxy(req).await {
            Ok(response) => response,
            Err(err) => {
                if let RequestError::Unexpected(details) = &err {
                    error!("Proxy request failed: {}", details);
                }
                response::error(&err)
            }
        }
    }

    async fn proxy<B>(
        &self,
        req: &Request<B>,
    ) -> std::result::Result<Response<ProxyBody>, RequestError> {
        let target = self.target(req)?;

        debug!("Fetching {}", target);
        let upstream = self.upstream.fetch(&target).await?;

        let status = upstream.status();
        if !status.is_success() {
            debug!("Upstream returned {} for {}", status, target);
            return Err(RequestError::UpstreamStatus(status));
        }

        let headers = self.response_headers(upstream.headers(), req.headers().contains_key(RANGE));

        let mut response = Response::new(response::stream(upstream));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }

    /// Extract, parse and authorize the target URL
    fn target<B>(&self, req: &Request<B>) -> std::result::Result<Url, RequestError> {
        let raw = req
            .uri()
            .query()
            .and_then(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == URL_PARAM)
                    .map(|(_, value)| value.into_owned())
            })
            .filter(|value| !value.is_empty())
            .ok_or(RequestError::MissingParameter)?;

        let target = Url::parse(&raw).map_err(RequestError::InvalidUrl)?;

        let host = target.host_str().unwrap_or_default();
        if !self.allowlist.is_allowed(host) {
            warn!("Rejected proxy request for host: {}", host);
            return Err(RequestError::ForbiddenHost {
                host: host.to_string(),
            });
        }

        Ok(target)
    }

    fn response_headers(&self, upstream: &HeaderMap, range_requested: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let content_type = upstream
            .get(CONTENT_TYPE)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| self.default_content_type.clone());
        headers.insert(CONTENT_TYPE, content_type);

        if let Some(length) = upstream.get(CONTENT_LENGTH).filter(|v| !v.is_empty()) {
            headers.insert(CONTENT_LENGTH, length.clone());
        }

        headers.insert(CACHE_CONTROL, self.cache_control.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

        // Seeking in the browser player needs this; the body itself is not sliced
        if range_requested {
            headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        }

        headers
    }
}

fn header_value(field: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        crate::error::ValidationError::InvalidHeaderValue {
            field,
            value: value.to_string(),
        }
        .into()
    })
}
