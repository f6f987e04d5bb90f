//! prefetch-proxy binary entrypoint.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use prefetch_proxy::config::{load_config, ProxyConfig};
use prefetch_proxy::lifecycle::signals;
use prefetch_proxy::observability::{logging, metrics};
use prefetch_proxy::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "prefetch-proxy")]
#[command(about = "Reverse proxy that pre-warms the edge cache for links it discovers")]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        origin = %config.origin.host,
        scheme = %config.origin.scheme,
        bind_address = %config.listener.bind_address,
        "prefetch-proxy starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    signals::listen_for_ctrl_c(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
