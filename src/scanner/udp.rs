//! UDP liveness probe.
//!
//! Sends a zero-length datagram on a connected socket and classifies what
//! comes back within the timeout.
//!
//! # Detection Methods
//!
//! 1. **UDP Response**: any datagram received means the port is open
//! 2. **Receive Error**: an ICMP port-unreachable surfaces as a refused
//!    receive on the connected socket, so the port is closed
//! 3. **No Response**: the port is either open or filtered (ambiguous)

use crate::scanner::traits::ProbeOutcome;
use crate::types::{Port, ResolvedAddress};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Receive buffer size; replies are only detected, never inspected.
const RECV_BUFFER: usize = 2048;

/// Probe one UDP port.
///
/// Local socket failures (bind, connect, send) are reported as closed for
/// this port only. The socket is dropped on every path.
pub async fn probe(target: ResolvedAddress, port: Port, limit: Duration) -> ProbeOutcome {
    let addr = target.socket_addr(port.as_u16());
    let local = SocketAddr::new(target.family.unspecified(), 0);

    match exchange(local, addr, limit).await {
        Ok(outcome) => {
            tracing::debug!(%addr, %outcome, "udp probe finished");
            outcome
        }
        Err(e) => {
            tracing::debug!(%addr, error = %e, "udp probe failed");
            ProbeOutcome::ClosedOrUnreachable
        }
    }
}

/// Send the empty datagram and wait for a reply or an error.
async fn exchange(local: SocketAddr, addr: SocketAddr, limit: Duration) -> io::Result<ProbeOutcome> {
    let socket = UdpSocket::bind(local).await?;
    socket.connect(addr).await?;
    socket.send(&[]).await?;

    let mut buf = [0u8; RECV_BUFFER];
    match timeout(limit, socket.recv(&mut buf)).await {
        Ok(Ok(_)) => Ok(ProbeOutcome::Open),
        Ok(Err(e)) => {
            tracing::debug!(%addr, kind = ?e.kind(), "udp receive error");
            Ok(ProbeOutcome::ClosedOrUnreachable)
        }
        Err(_) => Ok(ProbeOutcome::OpenOrFiltered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn localhost() -> ResolvedAddress {
        ResolvedAddress::new(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }

    #[tokio::test]
    async fn test_silent_port_is_open_filtered() {
        // Bound but never answers, so no ICMP error is generated either.
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(server.local_addr().unwrap().port()).unwrap();

        let outcome = probe(localhost(), port, Duration::from_millis(200)).await;
        assert_eq!(outcome, ProbeOutcome::OpenOrFiltered);
        drop(server);
    }

    #[tokio::test]
    async fn test_replying_port_is_open() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(server.local_addr().unwrap().port()).unwrap();

        let echo = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(b"pong", peer).await.unwrap();
        });

        let outcome = probe(localhost(), port, Duration::from_secs(2)).await;
        assert_eq!(outcome, ProbeOutcome::Open);
        echo.await.unwrap();
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_unreachable_port_is_closed() {
        let server = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = Port::new(server.local_addr().unwrap().port()).unwrap();
        drop(server);

        let outcome = probe(localhost(), port, Duration::from_secs(2)).await;
        assert_eq!(outcome, ProbeOutcome::ClosedOrUnreachable);
    }
}
