//! Decoded firehose events.
//!
//! An [`Envelope`] wraps exactly one event. Only the HTTP events carry the
//! fields needed to place an edge; the others are modelled so the stream can
//! be represented faithfully and filtered out by the mapper.

use serde::{Deserialize, Serialize};

/// Kind of event carried in an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    HttpStart,
    HttpStop,
    HttpStartStop,
    LogMessage,
    ValueMetric,
    CounterEvent,
    Error,
    ContainerMetric,
}

/// Which side of an HTTP interaction the reporting peer was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerType {
    Client,
    Server,
}

/// Start of an HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStart {
    pub timestamp: i64,
    pub request_id: String,
    pub peer_type: Option<PeerType>,
    pub method: String,
    pub uri: String,
    pub remote_address: String,
    pub user_agent: String,
}

/// A complete HTTP request, reported once the response was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStartStop {
    pub start_timestamp: i64,
    pub stop_timestamp: i64,
    pub request_id: String,
    pub peer_type: Option<PeerType>,
    pub method: String,
    pub uri: String,
    pub remote_address: String,
    pub user_agent: String,
    pub status_code: i32,
    pub content_length: i64,
}

/// An application log line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub message: String,
    pub app_id: String,
    pub source_type: String,
}

/// A single event from the firehose together with the identity of the
/// component that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub origin: String,
    pub event_type: EventType,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub deployment: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub index: String,
    /// Address of the emitting (observing) peer.
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub http_start: Option<HttpStart>,
    #[serde(default)]
    pub http_start_stop: Option<HttpStartStop>,
    #[serde(default)]
    pub log_message: Option<LogMessage>,
}

impl Envelope {
    /// Create an envelope with no payload.
    pub fn new(event_type: EventType, origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            event_type,
            timestamp: 0,
            deployment: String::new(),
            job: String::new(),
            index: String::new(),
            ip: String::new(),
            http_start: None,
            http_start_stop: None,
            log_message: None,
        }
    }

    /// Label for the emitting peer, `<job>/<index>`.
    pub fn instance_label(&self) -> String {
        format!("{}/{}", self.job, self.index)
    }
}
