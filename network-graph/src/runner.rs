//! Runs the ingestor and the HTTP server as one process group.
//!
//! Both members share a single graph. When either member exits, or the
//! external shutdown signal fires, the other one is told to stop and the
//! first failure is returned.

use std::future::Future;
use std::sync::Arc;

use ingestor::firehose::{Firehose, MockFirehose};
use ingestor::{FirehoseIngestor, IngestorConfig};
use network::NetworkGraph;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::Config;
use crate::errors::AppError;
use crate::server;

/// Which member ended the group first.
enum Exit {
    Signal,
    Ingestor(Result<(), AppError>),
    Server(Result<(), AppError>),
}

/// Pick the firehose transport for `config`.
///
/// Only the in-process mock transport ships with this service; it replays
/// the demo topology on the configured interval. A configured firehose
/// address is refused so the demo data is never served as live traffic.
pub fn firehose_from_config(config: &Config) -> Result<Arc<dyn Firehose>, AppError> {
    if let Some(address) = &config.firehose_address {
        return Err(AppError::config(format!(
            "no live firehose transport for DOPPLER_ADDR={}",
            address
        )));
    }

    info!(
        replay_interval = ?config.mock_replay_interval,
        "Using the mock firehose with the demo topology"
    );
    Ok(Arc::new(
        MockFirehose::demo_topology().replay_every(config.mock_replay_interval),
    ))
}

/// Run the ingestor and the server until one of them stops or `signal`
/// resolves.
pub async fn run_group<S>(
    config: Config,
    graph: Arc<NetworkGraph>,
    firehose: Arc<dyn Firehose>,
    signal: S,
) -> Result<(), AppError>
where
    S: Future<Output = ()>,
{
    let listener = TcpListener::bind(config.listen_addr()).await?;
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let ingestor = FirehoseIngestor::with_config(
        graph.clone(),
        IngestorConfig {
            subscription_id: config.subscription_id.clone(),
            ..IngestorConfig::default()
        },
    );
    let ingest_shutdown = shutdown_tx.subscribe();
    let mut ingest_handle: JoinHandle<Result<(), AppError>> = tokio::spawn(async move {
        ingestor
            .run_source(firehose.as_ref(), ingest_shutdown)
            .await
            .map_err(AppError::from)
    });

    let app = server::create_app(graph);
    let mut server_handle = tokio::spawn(server::run_server(
        listener,
        app,
        shutdown_tx.subscribe(),
    ));

    info!("Ingestor and server started");

    let exit = tokio::select! {
        _ = signal => Exit::Signal,
        res = &mut ingest_handle => Exit::Ingestor(flatten(res)),
        res = &mut server_handle => Exit::Server(flatten(res)),
    };

    let _ = shutdown_tx.send(());

    let result = match exit {
        Exit::Signal => {
            info!("Received shutdown signal");
            let ingest = flatten(ingest_handle.await);
            let server = flatten(server_handle.await);
            ingest.and(server)
        }
        Exit::Ingestor(res) => {
            if let Err(e) = &res {
                error!(error = %e, "Ingestor failed, stopping server");
            } else {
                info!("Ingestor finished, stopping server");
            }
            res.and(flatten(server_handle.await))
        }
        Exit::Server(res) => {
            if let Err(e) = &res {
                error!(error = %e, "Server failed, stopping ingestor");
            }
            res.and(flatten(ingest_handle.await))
        }
    };

    info!("Network graph stopped");
    result
}

fn flatten(res: Result<Result<(), AppError>, tokio::task::JoinError>) -> Result<(), AppError> {
    res?
}
