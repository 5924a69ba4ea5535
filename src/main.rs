//! Rental settlement service entry point.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rental_settlement::chain::ChainClient;
use rental_settlement::config::loader::load_config;
use rental_settlement::config::ServiceConfig;
use rental_settlement::directory::PropertyDirectory;
use rental_settlement::http::{AppState, HttpServer};
use rental_settlement::observability::metrics;

#[derive(Debug, Parser)]
#[command(name = "rental-settlement", about = "Rental-payment settlement service")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "settlement.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Missing config file falls back to defaults so a bare binary starts.
    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        ServiceConfig::default()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "rental_settlement={},tower_http=info",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rental-settlement starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.chain.rpc_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let chain = ChainClient::new(config.chain.clone()).await?;
    let directory = PropertyDirectory::from_config(&config.properties);
    let state = AppState::new(chain, directory);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, state);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
