//! Error types for lunascan.
//!
//! Uses `thiserror` for ergonomic error definitions. Only scan-level aborts
//! live here; individual probe failures are reported as outcomes, never as
//! errors.

use crate::types::TargetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan before or instead of probing.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no valid ports specified")]
    NoValidPorts,

    #[error("invalid timeout {0}: must be a positive number of seconds")]
    InvalidTimeout(f64),

    #[error("admission wait {wait:.3}s is shorter than one probe ({min:.3}s), ports would go unprobed")]
    AdmissionWaitTooShort { wait: f64, min: f64 },

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Process exit code for this error.
    ///
    /// 2 for bad user input (including an admission wait too short to probe
    /// anything), 3 when the target cannot be resolved,
    /// 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoValidPorts | Self::InvalidTimeout(_) | Self::AdmissionWaitTooShort { .. } => 2,
            Self::Target(e) if e.is_input_error() => 2,
            Self::Target(_) => 3,
            Self::Config(_) | Self::Io(_) => 1,
        }
    }
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors from loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
