//! Application settings and paths.
//!
//! Settings are read from `settings.json` in the XDG config directory, or
//! from an explicit path. Nothing is ever written back.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
use crate::types::ProtocolSelection;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/lunascan)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Does not create it.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "lunascan", "lunascan")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Scan defaults that command-line flags override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Per-probe timeout in seconds.
    pub timeout_secs: f64,
    /// Maximum simultaneously active probes.
    pub concurrency: usize,
    /// Protocol selection text (TCP, UDP or BOTH).
    pub protocol: String,
    /// Upper bound on waiting for a probe slot, in seconds.
    /// Derived from the timeout when unset.
    pub admission_wait_secs: Option<f64>,
    /// List closed ports in plain output.
    pub show_closed: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs_f64(),
            concurrency: DEFAULT_CONCURRENCY,
            protocol: "TCP".to_string(),
            admission_wait_secs: None,
            show_closed: false,
        }
    }
}

impl AppSettings {
    /// Load settings from `path` if given, otherwise from the default
    /// location. A missing default file yields the built-in defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let file = match Paths::discover() {
                    Ok(paths) => paths.settings_file(),
                    Err(e) => {
                        tracing::debug!(error = %e, "no config directory, using defaults");
                        return Ok(Self::default());
                    }
                };
                if !file.exists() {
                    return Ok(Self::default());
                }
                Self::load_from(&file)
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;

        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        self.timeout()?;
        self.admission_wait()?;
        Ok(())
    }

    /// Per-probe timeout as a duration.
    pub fn timeout(&self) -> ConfigResult<Duration> {
        positive_seconds("timeout_secs", self.timeout_secs)
    }

    /// Explicit admission wait, if configured.
    pub fn admission_wait(&self) -> ConfigResult<Option<Duration>> {
        self.admission_wait_secs
            .map(|secs| positive_seconds("admission_wait_secs", secs))
            .transpose()
    }

    /// Protocol selection, with the usual fallback to TCP.
    pub fn protocol_selection(&self) -> ProtocolSelection {
        ProtocolSelection::from_input(&self.protocol)
    }
}

/// Convert seconds to a duration, rejecting zero, negative and non-finite values.
pub fn positive_seconds(field: &'static str, secs: f64) -> ConfigResult<Duration> {
    if !(secs.is_finite() && secs > 0.0) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} is not a positive number of seconds", secs),
        });
    }
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.concurrency, 200);
        assert_eq!(settings.timeout().unwrap(), Duration::from_secs(1));
        assert_eq!(settings.protocol_selection(), ProtocolSelection::Tcp);
        assert_eq!(settings.admission_wait().unwrap(), None);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout_secs": 0.5, "protocol": "both"}}"#).unwrap();

        let settings = AppSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.timeout().unwrap(), Duration::from_millis(500));
        assert_eq!(settings.protocol_selection(), ProtocolSelection::Both);
        assert_eq!(settings.concurrency, 200);
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout_secs": -1}}"#).unwrap();

        let err = AppSettings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "timeout_secs", .. }));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = AppSettings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppSettings::load(Some(dir.path().join("nope.json").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_positive_seconds() {
        assert!(positive_seconds("t", 0.0).is_err());
        assert!(positive_seconds("t", f64::NAN).is_err());
        assert!(positive_seconds("t", f64::INFINITY).is_err());
        assert_eq!(positive_seconds("t", 1.5).unwrap(), Duration::from_millis(1500));
    }
}
