//! # ppass-cli — CLI Tool for PermitPass
//!
//! Provides the `ppass` command-line interface over a store snapshot.
//!
//! ## Subcommands
//!
//! - `ppass checklist` — Supplemental document checklist for a project.
//! - `ppass eval` — Evaluate one rule against attributes.
//! - `ppass explain` — Show how a rule source normalizes.
//!
//! ```bash
//! ppass checklist --project p-1 --pretty
//! ppass eval --rule 'amps >= 50' --values attrs.yaml
//! ppass explain --rule '{"any": ["has_battery", "amps > 100"]}'
//! ```

pub mod checklist;
pub mod config;
pub mod eval;
pub mod explain;

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use ppass_checklist::{Snapshot, SnapshotFormat};
use ppass_rules::AttributeMap;

/// Interpret a `--rule` argument: JSON when it parses, otherwise the text
/// itself as a string rule.
pub fn parse_rule_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Load the store snapshot, with the path in any error.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("loading snapshot {}", path.display()))
}

/// Read an attribute map from a JSON or YAML file.
pub fn load_attributes(path: &Path) -> Result<AttributeMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading attributes {}", path.display()))?;
    let value: Value = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => serde_json::from_str(&text)
            .with_context(|| format!("parsing JSON attributes {}", path.display()))?,
        SnapshotFormat::Yaml => serde_yaml::from_str(&text)
            .with_context(|| format!("parsing YAML attributes {}", path.display()))?,
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("attributes file {} must contain an object", path.display()),
    }
}
