//! # Lunascan - Luna Port Scanner
//!
//! Lunascan probes TCP and UDP ports on every address a target resolves to,
//! with a hard cap on how many probes are in flight at once.
//!
//! ## Features
//!
//! - **TCP connect probes**: a completed handshake means Open
//! - **UDP datagram probes**: a reply means Open, silence Open|Filtered
//! - **Bounded concurrency**: a semaphore admits at most N active probes
//! - **Dual-stack targets**: hostnames resolve to every IPv4 and IPv6 address
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lunascan::scanner::scan;
//! use lunascan::types::{PortSpec, Protocol, ResolvedAddress};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target = ResolvedAddress::new("127.0.0.1".parse().unwrap());
//!     let ports = PortSpec::parse("20-25,80");
//!
//!     let results = scan(target, &ports, &[Protocol::Tcp], 200, Duration::from_secs(1)).await;
//!     for result in results.iter().filter(|r| r.outcome.is_reportable()) {
//!         println!("{}", result);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, protocols and target resolution
//! - [`scanner`] - Probes, the bounded scheduler and scan reports
//! - [`config`] - Settings file handling
//! - [`output`] - Plain, JSON and CSV formatters
//! - [`cli`] - Argument parsing, one-shot and interactive modes
//! - [`error`] - Error types and exit codes

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, ScanError};
pub use scanner::{scan, PortResult, ProbeOutcome, Prober, ScanReport, Scheduler};
pub use types::{Port, PortSpec, Protocol, ProtocolSelection, ResolvedAddress};
