//! # Ingestor
//!
//! Builds the network graph from a firehose of HTTP telemetry.
//!
//! ## Architecture
//!
//! 1. **Firehose**: a transport delivers decoded [`Envelope`]s over a channel
//! 2. **Mapper**: filters envelopes and decides which nodes and edge each adds
//! 3. **Ingestor**: the long-running loop applying mapped events to the graph
//!
//! ## Modules
//!
//! - [`events`]: Decoded firehose event types
//! - [`mapper`]: Envelope to graph mutation mapping
//! - [`firehose`]: Transport contract and the mock transport
//! - [`ingestor`]: The ingestion loop
//! - [`errors`]: Error types for the ingestor

pub mod errors;
pub mod events;
pub mod firehose;
pub mod ingestor;
pub mod mapper;

pub use errors::{IngestError, TransportError};
pub use events::{Envelope, EventType, PeerType};
pub use ingestor::{FirehoseIngestor, IngestStats, IngestorConfig};
