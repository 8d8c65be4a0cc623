//! Envelope builders for tests and local runs.
//!
//! - `http_start` → `HttpStart` envelope
//! - `http_start_stop` → `HttpStartStop` envelope
//! - `log_message` → `LogMessage` envelope, ignored by the mapper
//!
//! [`demo_topology`] returns a small platform deployment: two routers
//! forwarding to three cells, with the cells calling an auth service.

use crate::events::{Envelope, EventType, HttpStart, HttpStartStop, LogMessage, PeerType};

const DEPLOYMENT: &str = "cf";

fn envelope(event_type: EventType, origin: &str, ip: &str, job: &str, index: &str) -> Envelope {
    let mut envelope = Envelope::new(event_type, origin);
    envelope.deployment = DEPLOYMENT.to_string();
    envelope.job = job.to_string();
    envelope.index = index.to_string();
    envelope.ip = ip.to_string();
    envelope
}

/// Create an `HttpStart` envelope emitted by `ip`.
pub fn http_start(
    ip: &str,
    job: &str,
    index: &str,
    remote_address: &str,
    peer_type: Option<PeerType>,
) -> Envelope {
    let mut envelope = envelope(EventType::HttpStart, job, ip, job, index);
    envelope.http_start = Some(HttpStart {
        peer_type,
        method: "GET".to_string(),
        uri: "/".to_string(),
        remote_address: remote_address.to_string(),
        ..Default::default()
    });
    envelope
}

/// Create an `HttpStartStop` envelope emitted by `ip`.
pub fn http_start_stop(
    ip: &str,
    job: &str,
    index: &str,
    remote_address: &str,
    peer_type: Option<PeerType>,
    status_code: i32,
) -> Envelope {
    let mut envelope = envelope(EventType::HttpStartStop, job, ip, job, index);
    envelope.http_start_stop = Some(HttpStartStop {
        peer_type,
        method: "GET".to_string(),
        uri: "/".to_string(),
        remote_address: remote_address.to_string(),
        status_code,
        ..Default::default()
    });
    envelope
}

/// Create a `LogMessage` envelope emitted by `ip`.
pub fn log_message(ip: &str, job: &str, index: &str, message: &str) -> Envelope {
    let mut envelope = envelope(EventType::LogMessage, job, ip, job, index);
    envelope.log_message = Some(LogMessage {
        message: message.to_string(),
        app_id: String::new(),
        source_type: "APP".to_string(),
    });
    envelope
}

/// Peer addresses used by [`demo_topology`].
pub mod demo {
    pub const ROUTER_0: &str = "10.0.16.4";
    pub const ROUTER_1: &str = "10.0.16.5";
    pub const CELL_0: &str = "10.0.32.10";
    pub const CELL_1: &str = "10.0.32.11";
    pub const CELL_2: &str = "10.0.32.12";
    pub const UAA: &str = "10.0.48.2";
}

/// Envelopes describing a small deployment.
///
/// Routers report client-side events for requests they forward to cells,
/// cells report server-side events for the same requests and client-side
/// events for their calls to the auth service. Log noise is mixed in.
pub fn demo_topology() -> Vec<Envelope> {
    use demo::*;

    let client = Some(PeerType::Client);
    let server = Some(PeerType::Server);

    vec![
        http_start_stop(ROUTER_0, "router", "0", &format!("{}:61001", CELL_0), client, 200),
        http_start_stop(ROUTER_0, "router", "0", &format!("{}:61002", CELL_1), client, 200),
        http_start_stop(ROUTER_1, "router", "1", &format!("{}:61001", CELL_0), client, 404),
        http_start_stop(ROUTER_1, "router", "1", &format!("{}:61003", CELL_2), client, 200),
        http_start_stop(CELL_0, "cell", "0", &format!("{}:43512", ROUTER_0), server, 200),
        http_start_stop(CELL_2, "cell", "2", &format!("{}:43513", ROUTER_1), server, 200),
        http_start(CELL_0, "cell", "0", &format!("{}:8443", UAA), client),
        http_start(CELL_1, "cell", "1", &format!("{}:8443", UAA), client),
        http_start_stop(UAA, "uaa", "0", &format!("{}:50210", CELL_1), server, 201),
        log_message(CELL_1, "cell", "1", "container healthy"),
        log_message(UAA, "uaa", "0", "token issued"),
    ]
}
