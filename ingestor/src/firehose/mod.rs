//! Firehose transport contract.
//!
//! A transport owns the connection to the event stream. Subscribing hands
//! back two receivers: decoded envelopes, and the transport's terminal
//! errors. The ingestor only ever reads from them.
//!
//! [`MockFirehose`] replays a fixed set of envelopes and is used for local
//! runs and tests.

mod mock;
pub mod mock_events;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::TransportError;
use crate::events::Envelope;

pub use mock::MockFirehose;

/// Subscription id used when none is configured.
pub const DEFAULT_SUBSCRIPTION_ID: &str = "firehose-a";

/// The receiving ends of a firehose subscription.
#[derive(Debug)]
pub struct FirehoseStream {
    pub events: mpsc::Receiver<Envelope>,
    pub errors: mpsc::Receiver<TransportError>,
}

/// A source of firehose envelopes.
#[async_trait]
pub trait Firehose: Send + Sync {
    /// Open a subscription.
    ///
    /// Subscribers sharing a `subscription_id` split the stream between them.
    async fn subscribe(&self, subscription_id: &str) -> Result<FirehoseStream, TransportError>;
}
