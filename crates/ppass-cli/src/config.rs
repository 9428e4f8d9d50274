//! CLI configuration.
//!
//! Settings come from the environment with defaults suited to a local
//! installation. Command-line flags override them.

use std::path::PathBuf;
use std::str::FromStr;

/// Snapshot location used when `PPASS_SNAPSHOT_PATH` is unset.
pub const DEFAULT_SNAPSHOT_PATH: &str = ".local/snapshot.json";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Store snapshot to read.
    pub snapshot_path: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            log_format: LogFormat::Text,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PPASS_SNAPSHOT_PATH` (default: `.local/snapshot.json`)
    /// - `PPASS_LOG_FORMAT` (`text` or `json`, default: `text`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let snapshot_path = match lookup("PPASS_SNAPSHOT_PATH") {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::EmptySnapshotPath),
            Some(raw) => PathBuf::from(raw.trim()),
            None => PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        };
        let log_format = match lookup("PPASS_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Text,
        };
        Ok(Self {
            snapshot_path,
            log_format,
        })
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, snapshot: Option<PathBuf>, log_json: bool) -> Self {
        if let Some(path) = snapshot {
            self.snapshot_path = path;
        }
        if log_json {
            self.log_format = LogFormat::Json;
        }
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PPASS_SNAPSHOT_PATH is set but empty")]
    EmptySnapshotPath,
    #[error("invalid PPASS_LOG_FORMAT {0:?}: expected \"text\" or \"json\"")]
    InvalidLogFormat(String),
}
