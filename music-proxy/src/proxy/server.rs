use super::handler::ProxyHandler;
use super::response::{self, ProxyBody};
use crate::config::Config;
use crate::error::Result;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, ALLOW};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

/// HTTP server configuration
#[derive(Clone)]
pub struct ProxyServerConfig {
    /// Address to listen on
    pub listen: SocketAddr,
    /// Path the proxy endpoint is served on
    pub route: String,
    /// Shared request handler
    pub handler: Arc<ProxyHandler>,
}

impl ProxyServerConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        let listen: SocketAddr = config.server.listen.parse().map_err(|_| {
            crate::error::ValidationError::InvalidListen {
                addr: config.server.listen.clone(),
            }
        })?;

        Ok(Self {
            listen,
            route: config.server.route.clone(),
            handler: Arc::new(ProxyHandler::from_config(config)?),
        })
    }
}

/// Music proxy HTTP server
pub struct ProxyServer {
    config: ProxyServerConfig,
    listener: TcpListener,
}

impl ProxyServer {
    /// Bind the listening socket
    pub async fn bind(config: ProxyServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.listen).await?;
        Ok(Self { config, listener })
    }

    /// Address actually bound (useful when listening on port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve connections forever
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve connections until `shutdown` resolves
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Music proxy listening on http://{}{}",
            self.local_addr()?,
            self.config.route
        );

        tokio::pin!(shutdown);
        loop {
            let (socket, peer) = tokio::select! {
                accepted = self.listener.accept() => accepted?,
                _ = &mut shutdown => {
                    info!("Shutting down, no longer accepting connections");
                    return Ok(());
                }
            };

            let config = self.config.clone();

            // Spawn a task for each connection
            tokio::spawn(async move {
                handle_client(socket, peer, config).await;
            });
        }
    }
}

/// Resolve when `signal` fires
///
/// If the signal cannot be installed the error is logged and the future
/// never resolves, so the server keeps running instead of exiting at once.
pub async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to install shutdown signal handler, running until killed: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Serve HTTP/1.1 on a single client connection
///
/// When the client goes away hyper drops the in-flight response, which
/// tears down the upstream request or body stream with it.
async fn handle_client(stream: TcpStream, peer: SocketAddr, config: ProxyServerConfig) {
    debug!("Client connected: {}", peer);

    let service = service_fn(move |req| {
        let config = config.clone();
        async move { Ok::<_, Infallible>(route(req, &config).await) }
    });

    if let Err(e) = http1::Builder::new()
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        debug!("Connection error from {}: {}", peer, e);
    }

    debug!("Client disconnected: {}", peer);
}

async fn route(req: Request<Incoming>, config: &ProxyServerConfig) -> Response<ProxyBody> {
    if req.uri().path() != config.route {
        return response::json(
            StatusCode::NOT_FOUND,
            &serde_json::json!({ "error": "not found" }),
        );
    }

    if req.method() != Method::GET {
        let mut response = response::json(
            StatusCode::METHOD_NOT_ALLOWED,
            &serde_json::json!({ "error": "method not allowed" }),
        );
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET"));
        return response;
    }

    // The request body is never read
    let (parts, _body) = req.into_parts();
    config.handler.handle(&Request::from_parts(parts, ())).await
}
