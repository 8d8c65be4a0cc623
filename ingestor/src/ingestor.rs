//! The ingestion loop.
//!
//! Reads envelopes from a firehose subscription and applies each one to the
//! graph. Runs until shutdown is signalled, the transport reports an error,
//! or the event stream ends.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use network::Graph;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, instrument, trace, warn};

use crate::errors::{IngestError, TransportError};
use crate::events::Envelope;
use crate::firehose::{Firehose, DEFAULT_SUBSCRIPTION_ID};
use crate::mapper::{map_envelope, MappedEvent};

/// Interval between progress log lines.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the ingestor.
#[derive(Debug, Clone)]
pub struct IngestorConfig {
    /// Firehose subscription id.
    pub subscription_id: String,
    /// How often to log processing progress.
    pub progress_interval: Duration,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            subscription_id: DEFAULT_SUBSCRIPTION_ID.to_string(),
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

/// Counters describing what the ingestor has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Envelopes that produced a graph update.
    pub applied: u64,
    /// Envelopes that were filtered out.
    pub skipped: u64,
}

/// Consumes firehose envelopes into a graph.
pub struct FirehoseIngestor {
    graph: Arc<dyn Graph>,
    config: IngestorConfig,
    applied: AtomicU64,
    skipped: AtomicU64,
}

impl FirehoseIngestor {
    /// Create an ingestor writing into `graph`.
    pub fn new(graph: Arc<dyn Graph>) -> Self {
        Self::with_config(graph, IngestorConfig::default())
    }

    /// Create an ingestor with custom configuration.
    pub fn with_config(graph: Arc<dyn Graph>, config: IngestorConfig) -> Self {
        Self {
            graph,
            config,
            applied: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> IngestStats {
        IngestStats {
            applied: self.applied.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Subscribe to `firehose` and run until shutdown or failure.
    #[instrument(skip(self, firehose, shutdown), fields(subscription_id = %self.config.subscription_id))]
    pub async fn run_source(
        &self,
        firehose: &dyn Firehose,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        let stream = firehose
            .subscribe(&self.config.subscription_id)
            .await
            .map_err(|e| IngestError::subscription(e.to_string()))?;

        info!("Subscribed to firehose");

        self.run(stream.events, stream.errors, shutdown).await
    }

    /// Process envelopes until one of the inputs ends the loop.
    ///
    /// - shutdown signal: returns `Ok(())`
    /// - transport error: returns `Err(IngestError::Transport)`
    /// - event channel closed: returns `Ok(())`
    ///
    /// A closed error channel only disables that input.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<Envelope>,
        mut errors: mpsc::Receiver<TransportError>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), IngestError> {
        let mut progress_timer = interval(self.config.progress_interval);
        progress_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first tick immediately
        progress_timer.tick().await;

        info!("Ingestor started, waiting for events");

        let result = loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Ingestor received shutdown signal");
                    break Ok(());
                }
                Some(err) = errors.recv() => {
                    warn!(error = %err, "Firehose reported an error");
                    break Err(IngestError::Transport(err));
                }
                envelope = events.recv() => {
                    match envelope {
                        Some(envelope) => self.process(&envelope),
                        None => {
                            info!("Firehose event stream ended");
                            break Ok(());
                        }
                    }
                }
                _ = progress_timer.tick() => {
                    let stats = self.stats();
                    info!(
                        events_applied = stats.applied,
                        events_skipped = stats.skipped,
                        "Ingest progress"
                    );
                }
            }
        };

        let stats = self.stats();
        info!(
            events_applied = stats.applied,
            events_skipped = stats.skipped,
            "Ingestor stopped"
        );
        result
    }

    /// Map one envelope and apply it to the graph.
    pub fn process(&self, envelope: &Envelope) {
        match map_envelope(envelope) {
            MappedEvent::Update(update) => {
                debug!(
                    source = %update.observer,
                    target = %update.remote,
                    "Adding edge"
                );
                update.apply(self.graph.as_ref());
                self.applied.fetch_add(1, Ordering::Relaxed);
            }
            MappedEvent::Skipped(reason) => {
                trace!(
                    reason = ?reason,
                    event_type = ?envelope.event_type,
                    origin = %envelope.origin,
                    "Skipped envelope"
                );
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
