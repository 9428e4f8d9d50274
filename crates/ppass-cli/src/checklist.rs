//! # Checklist Subcommand
//!
//! Composes the supplemental document checklist for a project from the
//! store snapshot and prints it as JSON.
//!
//! Jurisdiction and permit type default to the stored project's own. When
//! a parameter is still missing after defaulting, every missing name is
//! reported and the command exits with status 1.

use anyhow::{Context, Result};
use clap::Args;

use ppass_checklist::{Checklist, ChecklistQuery, Snapshot};
use ppass_core::{ProjectId, ValidationError};

use crate::config::CliConfig;

/// Arguments for the `ppass checklist` subcommand.
#[derive(Args, Debug)]
pub struct ChecklistArgs {
    /// Project to compose the checklist for.
    #[arg(long)]
    pub project: Option<String>,

    /// Jurisdiction (municipality) key; defaults to the stored project's.
    #[arg(long)]
    pub jurisdiction: Option<String>,

    /// Permit type key; defaults to the stored project's.
    #[arg(long)]
    pub permit_type: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the checklist subcommand.
///
/// Returns exit code: 0 on success, 1 on missing parameters.
pub fn run_checklist(args: &ChecklistArgs, config: &CliConfig) -> Result<u8> {
    let snapshot = crate::load_snapshot(&config.snapshot_path)?;

    let checklist = match checklist_for(args, &snapshot) {
        Ok(checklist) => checklist,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&checklist)
    } else {
        serde_json::to_string(&checklist)
    }
    .context("serializing checklist")?;
    println!("{output}");
    Ok(0)
}

/// Resolve the query against the snapshot and compose the checklist.
pub fn checklist_for(
    args: &ChecklistArgs,
    snapshot: &Snapshot,
) -> Result<Checklist, ValidationError> {
    let stored = args
        .project
        .as_deref()
        .and_then(|id| ProjectId::new(id).ok())
        .and_then(|id| snapshot.project(&id));

    if stored.is_none() {
        tracing::debug!(project = ?args.project, "project not in snapshot; no defaults applied");
    }

    let jurisdiction = non_blank(args.jurisdiction.as_deref())
        .or_else(|| stored.map(|p| p.jurisdiction_key.as_str()));
    let permit_type = non_blank(args.permit_type.as_deref())
        .or_else(|| stored.map(|p| p.permit_type_key.as_str()));

    let query = ChecklistQuery::new(jurisdiction, permit_type, args.project.as_deref())?;
    Ok(snapshot.checklist(&query))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        Snapshot::from_value(&json!({
            "supplementalRequirements": [
                {
                    "municipality_key": "cumberland",
                    "permit_type_key": "ev",
                    "doc_type_key": "final_elec",
                    "active": true,
                    "rule_definition": "amps >= 50"
                },
                {
                    "municipality_key": "yarmouth",
                    "permit_type_key": "ev",
                    "doc_type_key": "load_calc",
                    "active": true
                }
            ],
            "projects": [{
                "project_id": "p-1",
                "municipality_key": "cumberland",
                "permit_type_key": "ev",
                "created_at": "2026-02-01T09:00:00Z"
            }],
            "projectValues": {"p-1": {"amps": 60}}
        }))
    }

    fn args(
        project: Option<&str>,
        jurisdiction: Option<&str>,
        permit_type: Option<&str>,
    ) -> ChecklistArgs {
        ChecklistArgs {
            project: project.map(String::from),
            jurisdiction: jurisdiction.map(String::from),
            permit_type: permit_type.map(String::from),
            pretty: false,
        }
    }

    #[test]
    fn defaults_from_stored_project() {
        let checklist = checklist_for(&args(Some("p-1"), None, None), &snapshot()).unwrap();
        assert_eq!(checklist.counts.required, 1);
        assert_eq!(
            checklist.supplements[0].requirement.document_type_key.as_str(),
            "final_elec"
        );
    }

    #[test]
    fn explicit_flags_override_stored_project() {
        let checklist =
            checklist_for(&args(Some("p-1"), Some("yarmouth"), None), &snapshot()).unwrap();
        assert_eq!(
            checklist.supplements[0].requirement.document_type_key.as_str(),
            "load_calc"
        );
    }

    #[test]
    fn unknown_project_needs_explicit_keys() {
        let err = checklist_for(&args(Some("p-404"), None, Some("ev")), &snapshot()).unwrap_err();
        assert_eq!(err, ValidationError::MissingParameters(vec!["municipalityKey"]));

        let checklist =
            checklist_for(&args(Some("p-404"), Some("cumberland"), Some("ev")), &snapshot())
                .unwrap();
        // No stored attributes, so the amperage rule cannot hold.
        assert!(checklist.supplements.is_empty());
    }

    #[test]
    fn missing_project_is_reported() {
        let err = checklist_for(&args(None, None, None), &snapshot()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required query parameters: municipalityKey, permitTypeKey, projectId"
        );
    }

    #[test]
    fn run_reads_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            snapshot_path: dir.path().join("absent.json"),
            ..CliConfig::default()
        };
        assert_eq!(run_checklist(&args(Some("p-1"), Some("c"), Some("ev")), &config).unwrap(), 0);
        assert_eq!(run_checklist(&args(Some("p-1"), None, None), &config).unwrap(), 1);

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        let config = CliConfig {
            snapshot_path: broken,
            ..CliConfig::default()
        };
        assert!(run_checklist(&args(Some("p-1"), Some("c"), Some("ev")), &config).is_err());
    }
}
