use clap::Parser;
use music_proxy::proxy::shutdown_signal;
use music_proxy::{ConfigLoader, ConfigValidator, ProxyServer, ProxyServerConfig};
use std::path::PathBuf;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

#[derive(Parser, Debug)]
#[command(name = "music-proxy")]
#[command(about = "Streaming proxy for audio and images on allowlisted music CDNs")]
struct Args {
    /// Address to listen on (overrides the config file)
    #[arg(long, short = 'l', env = "MUSIC_PROXY_LISTEN")]
    listen: Option<String>,

    /// Config file path
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging before anything can log; the config may raise the level later
    let (filter, filter_handle) = reload::Layer::new(env_filter(args.verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = ConfigLoader::load_or_default(args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
        ConfigValidator::validate(&config)?;
    }

    if config.verbose && !args.verbose {
        filter_handle.reload(env_filter(true))?;
    }

    tracing::debug!(
        "Allowlisted domains: {}",
        config.allowlist.domains.join(", ")
    );

    let server_config = ProxyServerConfig::from_config(&config)?;
    let server = ProxyServer::bind(server_config).await?;

    server
        .serve_with_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}

fn env_filter(verbose: bool) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::from_default_env().add_directive(level.into())
}
