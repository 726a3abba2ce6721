//! Transport protocols and the user's protocol selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A transport protocol a probe runs over.
///
/// Ordered so that TCP sorts before UDP for the same port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// Connection-oriented handshake probe.
    Tcp,
    /// Datagram liveness probe.
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

/// Which protocols to probe each port with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProtocolSelection {
    #[default]
    Tcp,
    Udp,
    Both,
}

impl ProtocolSelection {
    /// Interpret user input case-insensitively. Anything unrecognized,
    /// including empty input, selects TCP.
    pub fn from_input(input: &str) -> Self {
        match input.trim().to_ascii_uppercase().as_str() {
            "TCP" => Self::Tcp,
            "UDP" => Self::Udp,
            "BOTH" => Self::Both,
            other => {
                if !other.is_empty() {
                    tracing::debug!(input = other, "unrecognized protocol, using TCP");
                }
                Self::Tcp
            }
        }
    }

    /// The protocols this selection expands to. Never empty.
    pub fn protocols(self) -> &'static [Protocol] {
        match self {
            Self::Tcp => &[Protocol::Tcp],
            Self::Udp => &[Protocol::Udp],
            Self::Both => &[Protocol::Tcp, Protocol::Udp],
        }
    }
}

impl fmt::Display for ProtocolSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
            Self::Both => write!(f, "TCP+UDP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_from_input() {
        assert_eq!(ProtocolSelection::from_input("tcp"), ProtocolSelection::Tcp);
        assert_eq!(ProtocolSelection::from_input(" Udp "), ProtocolSelection::Udp);
        assert_eq!(ProtocolSelection::from_input("BOTH"), ProtocolSelection::Both);
    }

    #[test]
    fn test_unrecognized_falls_back_to_tcp() {
        assert_eq!(ProtocolSelection::from_input("sctp"), ProtocolSelection::Tcp);
        assert_eq!(ProtocolSelection::from_input(""), ProtocolSelection::Tcp);
    }

    #[test]
    fn test_both_expands_to_two_protocols() {
        assert_eq!(
            ProtocolSelection::Both.protocols(),
            &[Protocol::Tcp, Protocol::Udp]
        );
        assert!(Protocol::Tcp < Protocol::Udp);
    }
}
