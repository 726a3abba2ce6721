//! Port types with validation and lenient parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSpec` turns free-form user input into an ascending, deduplicated
//! port list, skipping segments it cannot understand instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
}

/// A single segment of a port specification, before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Single(u64),
    Range(u64, u64),
}

impl Segment {
    /// Parse one comma-separated segment. Returns `None` for anything malformed.
    fn parse(part: &str) -> Option<Self> {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: u64 = start.trim().parse().ok()?;
                let end: u64 = end.trim().parse().ok()?;
                (start <= end).then_some(Self::Range(start, end))
            }
            None => part.parse().ok().map(Self::Single),
        }
    }

    /// The valid ports this segment covers, clipped to 1-65535.
    fn ports(self) -> impl Iterator<Item = Port> {
        let (start, end) = match self {
            Self::Single(p) => (p, p),
            Self::Range(start, end) => (start, end),
        };
        let start = start.max(u64::from(Port::MIN));
        let end = end.min(u64::from(Port::MAX));
        // An empty range when the segment lies entirely outside 1-65535.
        (start..=end).filter_map(|p| u16::try_from(p).ok().and_then(Port::new))
    }
}

/// An ascending, deduplicated set of ports to scan.
///
/// Parsing accepts:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Range: "20-25"
/// - Mixed: "22,80,443,8000-9000"
///
/// Malformed segments are skipped, so the result may be empty. Callers must
/// treat an empty spec as an input error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    ports: Vec<Port>,
}

impl PortSpec {
    /// Parse a textual port specification. Never fails.
    pub fn parse(input: &str) -> Self {
        let mut set = BTreeSet::new();

        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match Segment::parse(part) {
                Some(segment) => set.extend(segment.ports()),
                None => tracing::debug!(segment = part, "skipping malformed port segment"),
            }
        }

        Self {
            ports: set.into_iter().collect(),
        }
    }

    /// Build a spec from already-validated ports.
    pub fn from_ports(ports: impl IntoIterator<Item = Port>) -> Self {
        let set: BTreeSet<Port> = ports.into_iter().collect();
        Self {
            ports: set.into_iter().collect(),
        }
    }

    /// Ports in ascending order.
    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }

    /// Iterate over the ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    /// Number of ports in the spec.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Raw port numbers, mostly for display and tests.
    pub fn to_u16s(&self) -> Vec<u16> {
        self.ports.iter().map(|p| p.as_u16()).collect()
    }
}

/// Compact form: consecutive ports collapse into ranges ("20-25,80").
impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut runs: Vec<(u16, u16)> = Vec::new();
        for port in self.iter().map(Port::as_u16) {
            match runs.last_mut() {
                Some((_, end)) if u32::from(*end) + 1 == u32::from(port) => *end = port,
                _ => runs.push((port, port)),
            }
        }

        let parts: Vec<String> = runs
            .into_iter()
            .map(|(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{}-{}", start, end)
                }
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}
