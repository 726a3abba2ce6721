//! Probe outcomes, per-port results, and the prober abstraction.
//!
//! The scheduler only talks to a [`Prober`], so the network probes can be
//! swapped for instrumented ones in tests.

use crate::types::{Port, Protocol, ResolvedAddress};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Reachability state reported by a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// Handshake completed (TCP) or a reply arrived (UDP).
    #[serde(rename = "open")]
    Open,
    /// UDP silence: either open or silently filtered.
    #[serde(rename = "open|filtered")]
    OpenOrFiltered,
    /// Refused, timed out (TCP), unreachable, or the probe could not run.
    #[serde(rename = "closed")]
    ClosedOrUnreachable,
}

impl ProbeOutcome {
    /// Whether this outcome belongs in the default "open ports" listing.
    pub fn is_reportable(self) -> bool {
        matches!(self, Self::Open | Self::OpenOrFiltered)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::OpenOrFiltered => write!(f, "Open|Filtered"),
            Self::ClosedOrUnreachable => write!(f, "Closed"),
        }
    }
}

/// Result of probing one port over one protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortResult {
    /// The port number that was probed.
    pub port: Port,
    /// Protocol used.
    pub protocol: Protocol,
    /// What the probe observed.
    pub outcome: ProbeOutcome,
}

impl PortResult {
    /// Create a new port result.
    pub fn new(port: Port, protocol: Protocol, outcome: ProbeOutcome) -> Self {
        Self {
            port,
            protocol,
            outcome,
        }
    }

    /// Display order: by port, then protocol.
    pub fn sort_key(&self) -> (Port, Protocol) {
        (self.port, self.protocol)
    }
}

impl fmt::Display for PortResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.protocol, self.port, self.outcome)
    }
}

/// Something that can probe one (port, protocol) pair on an address.
///
/// Implementations must return within `timeout` plus teardown and must
/// never fail: every error becomes a [`ProbeOutcome`].
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single port.
    async fn probe(
        &self,
        target: ResolvedAddress,
        port: Port,
        protocol: Protocol,
        timeout: Duration,
    ) -> ProbeOutcome;
}

/// Prober that talks to the network with the TCP and UDP probe functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkProber;

#[async_trait]
impl Prober for NetworkProber {
    async fn probe(
        &self,
        target: ResolvedAddress,
        port: Port,
        protocol: Protocol,
        timeout: Duration,
    ) -> ProbeOutcome {
        match protocol {
            Protocol::Tcp => super::tcp::probe(target, port, timeout).await,
            Protocol::Udp => super::udp::probe(target, port, timeout).await,
        }
    }
}
