//! Network Graph Main Entry Point
//!
//! Builds the network graph from the firehose and serves it on
//! `/network` (JSON) and `/network/dot` (DOT).

use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use network::NetworkGraph;
use network_graph::runner::{firehose_from_config, run_group};
use network_graph::{AppError, Config};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("network_graph=info,ingestor=info,network=info"));

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "network-graph",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json,
        "Tracing initialized"
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;
    info!(config = ?config, "Starting network graph");

    let graph = Arc::new(NetworkGraph::new());
    let firehose = firehose_from_config(&config)?;

    match run_group(config, graph, firehose, shutdown_signal()).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(error = %e, "Network graph exited with an error");
            Err(e)
        }
    }
}
