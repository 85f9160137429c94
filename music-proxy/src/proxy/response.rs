//! Response bodies produced by the proxy

use crate::error::RequestError;
use futures_util::TryStreamExt;
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body type for every response the proxy sends
pub type ProxyBody = UnsyncBoxBody<Bytes, BoxError>;

/// Fixed-size body from bytes
pub fn full(bytes: impl Into<Bytes>) -> ProxyBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Relay an upstream body frame by frame without buffering
///
/// Dropping the returned body drops the upstream stream and with it the
/// upstream connection.
pub fn stream(upstream: reqwest::Response) -> ProxyBody {
    let frames = upstream
        .bytes_stream()
        .map_ok(Frame::data)
        .map_err(|e| Box::new(e) as BoxError);

    StreamBody::new(frames).boxed_unsync()
}

/// JSON response with the given status
pub fn json(status: StatusCode, value: &serde_json::Value) -> Response<ProxyBody> {
    let mut response = Response::new(full(value.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Error response for a failed request
pub fn error(err: &RequestError) -> Response<ProxyBody> {
    json(err.status(), &err.body())
}
