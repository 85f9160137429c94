//! HTTP proxy: server, request handler and upstream client

pub mod handler;
pub mod response;
pub mod server;
pub mod upstream;

pub use handler::ProxyHandler;
pub use server::{shutdown_signal, ProxyServer, ProxyServerConfig};
pub use upstream::UpstreamClient;
