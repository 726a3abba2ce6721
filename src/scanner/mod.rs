//! Scanner module - probes and the bounded scheduler that drives them.
//!
//! [`tcp`] and [`udp`] hold the protocol-specific probe functions,
//! [`traits`] the outcome types and the [`Prober`] seam, [`scheduler`]
//! fans probes out under a concurrency cap on the tokio runtime, and
//! [`report`] aggregates one address's results for display.

pub mod report;
pub mod scheduler;
pub mod tcp;
pub mod traits;
pub mod udp;

pub use report::ScanReport;
pub use scheduler::{scan, Scheduler, ADMISSION_SLACK, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
pub use traits::{NetworkProber, PortResult, ProbeOutcome, Prober};
