//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io;

/// Render every result of every report as one CSV table.
pub fn render_csv(reports: &[ScanReport]) -> io::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(["target", "address", "family", "port", "protocol", "outcome"])?;

    for report in reports {
        for result in &report.results {
            wtr.write_record([
                report.target.clone(),
                report.address.to_string(),
                report.family.to_string(),
                result.port.to_string(),
                result.protocol.to_string(),
                result.outcome.to_string(),
            ])?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| io::Error::other(e.to_string()))?;
    String::from_utf8(bytes).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortResult, ProbeOutcome};
    use crate::types::{Port, Protocol, ResolvedAddress};
    use chrono::Utc;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    #[test]
    fn test_render_csv_rows() {
        let report = ScanReport::new(
            "127.0.0.1",
            ResolvedAddress::new(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            &[Protocol::Tcp],
            2,
            vec![
                PortResult::new(Port::new(443).unwrap(), Protocol::Tcp, ProbeOutcome::ClosedOrUnreachable),
                PortResult::new(Port::new(80).unwrap(), Protocol::Tcp, ProbeOutcome::Open),
            ],
            Utc::now(),
            Duration::ZERO,
        );

        let csv = render_csv(&[report]).unwrap();
        assert_eq!(
            csv,
            "target,address,family,port,protocol,outcome\n\
             127.0.0.1,127.0.0.1,IPv4,80,TCP,Open\n\
             127.0.0.1,127.0.0.1,IPv4,443,TCP,Closed\n"
        );
    }
}
