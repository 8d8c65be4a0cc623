//! In-process firehose that replays a fixed list of envelopes.
//!
//! # Example
//!
//! ```ignore
//! use ingestor::firehose::{Firehose, MockFirehose, mock_events};
//!
//! let firehose = MockFirehose::new(mock_events::demo_topology())
//!     .replay_every(Duration::from_secs(5));
//! let stream = firehose.subscribe("firehose-a").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::{mock_events, Firehose, FirehoseStream};
use crate::errors::TransportError;
use crate::events::Envelope;

const EVENT_BUFFER_SIZE: usize = 256;

/// Firehose that delivers a fixed list of envelopes.
///
/// Without a replay interval the envelopes are sent once and the event
/// channel closes. With one, the list is sent again after each interval
/// until the subscriber goes away. A configured terminal error is sent
/// after the first pass and ends the subscription.
#[derive(Debug, Clone)]
pub struct MockFirehose {
    envelopes: Vec<Envelope>,
    terminal_error: Option<TransportError>,
    replay_interval: Option<Duration>,
}

impl MockFirehose {
    pub fn new(envelopes: Vec<Envelope>) -> Self {
        Self {
            envelopes,
            terminal_error: None,
            replay_interval: None,
        }
    }

    /// Firehose preloaded with [`mock_events::demo_topology`].
    pub fn demo_topology() -> Self {
        Self::new(mock_events::demo_topology())
    }

    /// Fail the subscription with `error` once the envelopes are delivered.
    pub fn with_error(mut self, error: TransportError) -> Self {
        self.terminal_error = Some(error);
        self
    }

    /// Replay the envelopes every `interval`.
    pub fn replay_every(mut self, interval: Duration) -> Self {
        self.replay_interval = Some(interval);
        self
    }
}

#[async_trait]
impl Firehose for MockFirehose {
    async fn subscribe(&self, subscription_id: &str) -> Result<FirehoseStream, TransportError> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER_SIZE);
        let (error_tx, error_rx) = mpsc::channel(1);

        let envelopes = self.envelopes.clone();
        let mut terminal_error = self.terminal_error.clone();
        let replay_interval = self.replay_interval;
        let subscription_id = subscription_id.to_string();

        tokio::spawn(async move {
            let mut passes: u64 = 0;
            loop {
                for envelope in &envelopes {
                    if event_tx.send(envelope.clone()).await.is_err() {
                        debug!(subscription_id = %subscription_id, "Mock firehose subscriber dropped");
                        return;
                    }
                }
                passes += 1;
                debug!(
                    subscription_id = %subscription_id,
                    passes = passes,
                    envelopes = envelopes.len(),
                    "Mock firehose delivered envelopes"
                );

                if let Some(error) = terminal_error.take() {
                    if error_tx.send(error).await.is_ok() {
                        // Keep the event channel open so the error is seen
                        // before the stream looks finished.
                        error_tx.closed().await;
                    }
                    return;
                }

                match replay_interval {
                    Some(interval) => tokio::time::sleep(interval).await,
                    None => return,
                }
            }
        });

        Ok(FirehoseStream {
            events: event_rx,
            errors: error_rx,
        })
    }
}
