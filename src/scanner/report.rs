//! Per-address scan report.

use crate::scanner::traits::{PortResult, ProbeOutcome};
use crate::types::{AddressFamily, Protocol, ResolvedAddress};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::IpAddr;
use std::time::Duration;

/// Everything the formatters need about one scanned address.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Target as the user typed it.
    pub target: String,
    /// Address that was probed.
    pub address: IpAddr,
    /// Family of `address`.
    pub family: AddressFamily,
    /// Protocols each port was probed with.
    pub protocols: Vec<Protocol>,
    /// Number of distinct ports requested.
    pub ports_scanned: usize,
    pub open: usize,
    pub open_filtered: usize,
    pub closed: usize,
    /// When probing started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock scan time in milliseconds.
    pub duration_ms: u64,
    /// Results sorted by (port, protocol).
    pub results: Vec<PortResult>,
}

impl ScanReport {
    /// Build a report, sorting the results and tallying outcomes.
    pub fn new(
        target: impl Into<String>,
        address: ResolvedAddress,
        protocols: &[Protocol],
        ports_scanned: usize,
        mut results: Vec<PortResult>,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        results.sort_by_key(PortResult::sort_key);

        let count = |outcome: ProbeOutcome| results.iter().filter(|r| r.outcome == outcome).count();
        let open = count(ProbeOutcome::Open);
        let open_filtered = count(ProbeOutcome::OpenOrFiltered);
        let closed = count(ProbeOutcome::ClosedOrUnreachable);

        Self {
            target: target.into(),
            address: address.ip,
            family: address.family,
            protocols: protocols.to_vec(),
            ports_scanned,
            open,
            open_filtered,
            closed,
            started_at,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            results,
        }
    }

    /// Results worth listing by default: open and open|filtered.
    pub fn reportable(&self) -> impl Iterator<Item = &PortResult> {
        self.results.iter().filter(|r| r.outcome.is_reportable())
    }
}
