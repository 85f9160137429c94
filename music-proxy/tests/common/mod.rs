//! Mock CDN for integration tests.
//!
//! Serves a fixed status and body on every path and records the request
//! headers it receives. Allowlisted hostnames are pointed at it through
//! DNS overrides on the upstream client.

#![allow(dead_code)]

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderMap, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use music_proxy::config::Config;
use music_proxy::{ProxyHandler, UpstreamClient};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct MockOptions {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub content_type: Option<&'static str>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: Vec::new(),
            content_type: Some("audio/mpeg"),
        }
    }
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockUpstream {
    /// Headers of every request received so far
    pub fn requests(&self) -> Vec<HeaderMap> {
        self.requests.lock().unwrap().clone()
    }

    /// URL on an allowlisted host that resolves to this server
    pub fn url(&self, host: &str, path: &str) -> String {
        format!("http://{}:{}{}", host, self.addr.port(), path)
    }
}

/// Start the mock on an ephemeral port; it runs until the runtime shuts down.
pub async fn start(opts: MockOptions) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let recorded = Arc::clone(&requests);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let opts = opts.clone();
            let recorded = Arc::clone(&recorded);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    recorded.lock().unwrap().push(req.headers().clone());
                    let mut response = Response::new(Full::new(Bytes::from(opts.body.clone())));
                    *response.status_mut() = opts.status;
                    if let Some(content_type) = opts.content_type {
                        response
                            .headers_mut()
                            .insert(CONTENT_TYPE, content_type.parse().unwrap());
                    }
                    async move { Ok::<_, Infallible>(response) }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    MockUpstream { addr, requests }
}

/// Handler with the default configuration whose upstream client resolves
/// the given allowlisted hosts to `addr`
pub fn handler(addr: SocketAddr, hosts: &[&str]) -> ProxyHandler {
    let config = Config::default();
    let mut builder = UpstreamClient::builder(&config.upstream).no_proxy();
    for host in hosts {
        builder = builder.resolve(host, addr);
    }
    let upstream = UpstreamClient::with_client(builder.build().unwrap(), &config.upstream);
    ProxyHandler::new(config.allowlist.to_allowlist(), upstream, &config.response).unwrap()
}

/// Proxy endpoint URI for a target URL
pub fn proxy_uri(target: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", target)
        .finish();
    format!("/api/music/proxy?{}", query)
}
