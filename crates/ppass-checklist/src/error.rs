//! Checklist-specific error types.
//!
//! Snapshot errors carry the file path so operators can locate the broken
//! store file. Record errors explain why a single catalog row was skipped;
//! they are logged, never propagated past the snapshot reader.

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading a store snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file exists but could not be read.
    #[error("failed to read snapshot at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON snapshot at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML snapshot at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Why a loose catalog row could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The row is not a JSON object.
    #[error("record is not an object")]
    NotAnObject,

    /// A required column was absent, blank, or of the wrong type.
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),
}
