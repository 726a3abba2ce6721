//! Configuration management for lunascan.
//!
//! Provides XDG-compliant settings lookup for scan defaults.

mod settings;

pub use settings::{positive_seconds, AppSettings, Paths};
