//! TCP connect probe.
//!
//! Performs a standard connect() through the operating system's socket API.
//! No privileges are needed and no data is exchanged: a completed handshake
//! means open, anything else means closed or unreachable.

use crate::scanner::traits::ProbeOutcome;
use crate::types::{Port, ResolvedAddress};
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Probe one TCP port.
///
/// The stream is dropped as soon as the handshake completes. On timeout the
/// pending connect future is dropped, which closes its socket.
pub async fn probe(target: ResolvedAddress, port: Port, limit: Duration) -> ProbeOutcome {
    let addr = target.socket_addr(port.as_u16());

    match timeout(limit, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            tracing::debug!(%addr, "tcp handshake completed");
            ProbeOutcome::Open
        }
        Ok(Err(e)) => {
            tracing::debug!(%addr, reason = failure_reason(&e), error = %e, "tcp connect failed");
            ProbeOutcome::ClosedOrUnreachable
        }
        Err(_) => {
            tracing::debug!(%addr, "tcp connect timed out");
            ProbeOutcome::ClosedOrUnreachable
        }
    }
}

/// Short label for a connect failure, used in logs only.
fn failure_reason(e: &io::Error) -> &'static str {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => "refused",
        io::ErrorKind::ConnectionReset => "reset",
        io::ErrorKind::PermissionDenied => "denied",
        io::ErrorKind::AddrNotAvailable => "address unavailable",
        _ => "error",
    }
}
