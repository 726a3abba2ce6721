//! Target resolution.
//!
//! Turns the user's target text (hostname or literal IP) into the list of
//! concrete addresses to scan, one entry per distinct address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use trust_dns_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use trust_dns_resolver::{system_conf, TokioAsyncResolver};

/// Address family of a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    #[serde(rename = "IPv4")]
    Ipv4,
    #[serde(rename = "IPv6")]
    Ipv6,
}

impl AddressFamily {
    /// The wildcard address of this family, used to bind local sockets.
    pub fn unspecified(self) -> IpAddr {
        match self {
            Self::Ipv4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Self::Ipv6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "IPv4"),
            Self::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// One concrete address produced by resolving a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// The resolved IP address.
    pub ip: IpAddr,
    /// Its address family.
    pub family: AddressFamily,
}

impl ResolvedAddress {
    /// Wrap an IP address, deriving its family.
    pub fn new(ip: IpAddr) -> Self {
        let family = match ip {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        };
        Self { ip, family }
    }

    /// Socket address for a given port on this host.
    pub fn socket_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.ip, port)
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ip, self.family)
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target: '{0}'")]
    InvalidFormat(String),
    #[error("could not resolve {0}: {1}")]
    DnsResolutionFailed(String, String),
    #[error("no addresses found for {0}")]
    NoAddressesFound(String),
}

impl TargetError {
    /// True when the input itself was unusable rather than the lookup failing.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidFormat(_))
    }
}

/// Resolve a hostname or literal IP to every distinct address it maps to.
///
/// Literal addresses (optionally bracketed IPv6) bypass DNS. Hostnames are
/// looked up with the system resolver configuration, falling back to the
/// resolver defaults when the system configuration cannot be read. Both A
/// and AAAA records are requested.
pub async fn resolve(target: &str) -> Result<Vec<ResolvedAddress>, TargetError> {
    let target = target.trim();
    let literal = target
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(target);

    if let Ok(ip) = literal.parse::<IpAddr>() {
        return Ok(vec![ResolvedAddress::new(ip)]);
    }

    if !is_valid_hostname(target) {
        return Err(TargetError::InvalidFormat(target.to_string()));
    }

    let (config, opts) = match system_conf::read_system_conf() {
        Ok(conf) => conf,
        Err(e) => {
            tracing::debug!(error = %e, "system resolver config unavailable, using defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };
    let resolver = TokioAsyncResolver::tokio(config, dual_stack(opts));

    let response = resolver
        .lookup_ip(target)
        .await
        .map_err(|e| TargetError::DnsResolutionFailed(target.to_string(), e.to_string()))?;

    let addresses = dedup_addresses(response.iter());
    if addresses.is_empty() {
        return Err(TargetError::NoAddressesFound(target.to_string()));
    }

    tracing::debug!(host = target, count = addresses.len(), "resolved target");
    Ok(addresses)
}

/// Ask for A and AAAA records together so dual-stack hosts yield both families.
fn dual_stack(mut opts: ResolverOpts) -> ResolverOpts {
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
    opts
}

/// Keep the first occurrence of each address, preserving resolver order.
fn dedup_addresses(ips: impl IntoIterator<Item = IpAddr>) -> Vec<ResolvedAddress> {
    let mut out: Vec<ResolvedAddress> = Vec::new();
    for ip in ips {
        let address = ResolvedAddress::new(ip);
        if !out.contains(&address) {
            out.push(address);
        }
    }
    out
}

/// Check if a string is a plausible hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    let s = s.strip_suffix('.').unwrap_or(s);
    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().next().is_some_and(|c| c.is_alphanumeric())
            && label.chars().last().is_some_and(|c| c.is_alphanumeric())
            && label
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_ipv4_literal() {
        let addrs = resolve("127.0.0.1").await.unwrap();
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].family, AddressFamily::Ipv4);
        assert_eq!(addrs[0].ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_resolve_ipv6_literal() {
        let addrs = resolve("[::1]").await.unwrap();
        assert_eq!(addrs, vec![ResolvedAddress::new(IpAddr::V6(Ipv6Addr::LOCALHOST))]);
        assert_eq!(addrs[0].family, AddressFamily::Ipv6);
    }

    #[tokio::test]
    async fn test_resolve_rejects_garbage() {
        let err = resolve("not a host!").await.unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_lookup_queries_both_families() {
        let opts = dual_stack(ResolverOpts::default());
        assert_eq!(opts.ip_strategy, LookupIpStrategy::Ipv4AndIpv6);

        let mut custom = ResolverOpts::default();
        custom.ip_strategy = LookupIpStrategy::Ipv6Only;
        assert_eq!(dual_stack(custom).ip_strategy, LookupIpStrategy::Ipv4AndIpv6);
    }

    #[test]
    fn test_dedup_addresses() {
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let out = dedup_addresses([a, b, a, b]);
        assert_eq!(out, vec![ResolvedAddress::new(a), ResolvedAddress::new(b)]);
    }

    #[test]
    fn test_valid_hostname() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("example.com."));
        assert!(is_valid_hostname("my-server"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-invalid.com"));
        assert!(!is_valid_hostname("has space.com"));
    }

    #[test]
    fn test_display() {
        let addr = ResolvedAddress::new(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(addr.to_string(), "127.0.0.1 (IPv4)");
        assert_eq!(addr.family.unspecified(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
