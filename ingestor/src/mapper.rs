//! Event to graph mapping.
//!
//! Decides, for a single envelope, which nodes and which directed edge it
//! contributes. Mapping is split from application so the decision can be
//! checked without a graph:
//!
//! 1. [`map_envelope`] filters and classifies the envelope
//! 2. [`GraphUpdate::apply`] issues the node and edge mutations

use network::{Graph, PeerId};
use tracing::{error, trace};

use crate::events::{Envelope, EventType, HttpStart, HttpStartStop, PeerType};

/// The HTTP events that contribute to the graph.
#[derive(Debug, Clone, Copy)]
pub enum HttpActivity<'a> {
    Start(&'a HttpStart),
    StartStop(&'a HttpStartStop),
    /// Any other event, or an HTTP event without its payload.
    Ignored,
}

impl<'a> HttpActivity<'a> {
    /// Classify an envelope by its event type.
    pub fn classify(envelope: &'a Envelope) -> Self {
        match envelope.event_type {
            EventType::HttpStart => envelope
                .http_start
                .as_ref()
                .map_or(Self::Ignored, Self::Start),
            EventType::HttpStartStop => envelope
                .http_start_stop
                .as_ref()
                .map_or(Self::Ignored, Self::StartStop),
            _ => Self::Ignored,
        }
    }

    fn remote_address(&self) -> Option<&'a str> {
        match *self {
            Self::Start(event) => Some(event.remote_address.as_str()),
            Self::StartStop(event) => Some(event.remote_address.as_str()),
            Self::Ignored => None,
        }
    }

    fn peer_type(&self) -> Option<PeerType> {
        match *self {
            Self::Start(event) => event.peer_type,
            Self::StartStop(event) => event.peer_type,
            Self::Ignored => None,
        }
    }
}

/// Why an envelope produced no graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The envelope did not say which peer emitted it.
    MissingObserver,
    /// Not an HTTP start or start/stop event.
    Irrelevant,
    /// The HTTP event had no remote address, or one without a host.
    MissingRemoteAddress,
}

/// The mutations a single envelope contributes to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphUpdate {
    /// The peer that emitted the event.
    pub observer: PeerId,
    /// Label for the observer, `<job>/<index>`.
    pub observer_label: String,
    /// The other side of the interaction.
    pub remote: PeerId,
    /// Directed edge `(source, target)`, absent when the role is unknown.
    pub edge: Option<(PeerId, PeerId)>,
}

impl GraphUpdate {
    /// Add both peers, then the edge between them.
    ///
    /// A failed edge insert is logged and swallowed: both nodes were added
    /// just before, so it indicates a broken graph implementation rather
    /// than bad input.
    pub fn apply(&self, graph: &dyn Graph) {
        graph.add_node(&self.observer, &self.observer_label);
        graph.add_node(&self.remote, "");

        if let Some((src, target)) = &self.edge {
            if let Err(e) = graph.add_edge(src, target) {
                error!(
                    error = %e,
                    source = %src,
                    target = %target,
                    "Failed to add edge after adding both nodes"
                );
            }
        }
    }
}

/// Outcome of mapping one envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedEvent {
    Update(GraphUpdate),
    Skipped(SkipReason),
}

/// Decide what an envelope contributes to the graph.
pub fn map_envelope(envelope: &Envelope) -> MappedEvent {
    if envelope.ip.is_empty() {
        return MappedEvent::Skipped(SkipReason::MissingObserver);
    }

    let activity = HttpActivity::classify(envelope);
    let remote_address = match activity.remote_address() {
        None => return MappedEvent::Skipped(SkipReason::Irrelevant),
        Some("") => return MappedEvent::Skipped(SkipReason::MissingRemoteAddress),
        Some(address) => address,
    };

    let remote = PeerId::new(remote_host(remote_address));
    if remote.is_empty() {
        return MappedEvent::Skipped(SkipReason::MissingRemoteAddress);
    }
    let observer = PeerId::new(envelope.ip.as_str());

    trace!(source = %observer, target = %remote, "Mapping HTTP event");

    let edge = match activity.peer_type() {
        Some(PeerType::Client) => Some((observer.clone(), remote.clone())),
        Some(PeerType::Server) => Some((remote.clone(), observer.clone())),
        None => None,
    };

    MappedEvent::Update(GraphUpdate {
        observer,
        observer_label: envelope.instance_label(),
        remote,
        edge,
    })
}

/// Host part of a `host:port` address.
///
/// `[::1]:8080` yields `::1`. An address with several colons and no
/// brackets is a bare IPv6 literal and is returned unchanged.
pub fn remote_host(address: &str) -> &str {
    if let Some(rest) = address.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return &rest[..end];
        }
    }

    match address.rsplit_once(':') {
        Some((host, _port)) if !host.contains(':') => host,
        _ => address,
    }
}
