//! # Store Snapshots
//!
//! Point-in-time view of the PermitPass store, as written by the persistence
//! layer: a single JSON (or YAML) object with top-level `documentTypes`,
//! `supplementalRequirements`, `documents`, `projects` and `projectValues`.
//!
//! Loading is tolerant. Missing sections are empty, rows that cannot be read
//! are logged and skipped, and a missing snapshot file is an empty store.
//! Only unreadable or unparseable files are errors.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use ppass_core::{DocumentRecord, DocumentType, ProjectId, ProjectRecord};
use ppass_rules::AttributeMap;

use crate::catalog::{FromRecord, Requirement};
use crate::compose::{compose_checklist, Checklist, ChecklistQuery};
use crate::error::SnapshotError;

/// Snapshot encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// JSON (default).
    Json,
    /// YAML, for `.yaml` and `.yml` files.
    Yaml,
}

impl SnapshotFormat {
    /// Pick the format for `path`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// The store contents the checklist needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Document-type catalog.
    pub document_types: Vec<DocumentType>,
    /// Supplemental requirement catalog, in catalog order.
    pub requirements: Vec<Requirement>,
    /// Uploaded documents.
    pub documents: Vec<DocumentRecord>,
    /// Stored projects.
    pub projects: Vec<ProjectRecord>,
    /// Attribute maps keyed by project id.
    pub project_values: BTreeMap<String, AttributeMap>,
}

impl Snapshot {
    /// Read a snapshot from an already-parsed store object.
    ///
    /// A non-object value yields an empty snapshot.
    pub fn from_value(value: &Value) -> Self {
        let Some(store) = value.as_object() else {
            warn!("snapshot root is not an object; treating store as empty");
            return Self::default();
        };

        let project_values = match store.get("projectValues") {
            Some(Value::Object(values)) => values
                .iter()
                .filter_map(|(project_id, attributes)| match attributes {
                    Value::Object(map) => Some((project_id.trim().to_string(), map.clone())),
                    _ => {
                        warn!(project = %project_id, "skipping non-object project values");
                        None
                    }
                })
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            document_types: read_section(store.get("documentTypes"), "documentTypes"),
            requirements: read_section(
                store.get("supplementalRequirements"),
                "supplementalRequirements",
            ),
            documents: read_section(store.get("documents"), "documents"),
            projects: read_section(store.get("projects"), "projects"),
            project_values,
        }
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Parse a YAML snapshot.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Load the snapshot at `path`.
    ///
    /// A file that does not exist is an empty store, matching a fresh
    /// installation that has not persisted anything yet.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no snapshot found; using empty store");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SnapshotError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let snapshot = match SnapshotFormat::from_path(path) {
            SnapshotFormat::Json => {
                Self::from_json_str(&text).map_err(|source| SnapshotError::JsonParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            SnapshotFormat::Yaml => {
                Self::from_yaml_str(&text).map_err(|source| SnapshotError::YamlParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };

        info!(
            path = %path.display(),
            requirements = snapshot.requirements.len(),
            document_types = snapshot.document_types.len(),
            documents = snapshot.documents.len(),
            projects = snapshot.projects.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Look up a stored project.
    pub fn project(&self, project_id: &ProjectId) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.project_id == *project_id)
    }

    /// A project's attributes; empty when none are stored.
    pub fn attributes_for(&self, project_id: &ProjectId) -> Cow<'_, AttributeMap> {
        match self.project_values.get(project_id.as_str()) {
            Some(values) => Cow::Borrowed(values),
            None => {
                debug!(project = %project_id, "no project values stored");
                Cow::Owned(AttributeMap::new())
            }
        }
    }

    /// Compose the supplemental checklist for `query` from this snapshot.
    pub fn checklist(&self, query: &ChecklistQuery) -> Checklist {
        compose_checklist(
            &self.requirements,
            &self.document_types,
            &self.documents,
            query,
            &self.attributes_for(&query.project_id),
        )
    }
}

/// Read every usable row of a store section, logging the rest.
fn read_section<T: FromRecord>(section: Option<&Value>, name: &str) -> Vec<T> {
    match section {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(rows)) => rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| match T::from_record(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(section = name, index, error = %e, "skipping unreadable record");
                    None
                }
            })
            .collect(),
        Some(_) => {
            warn!(section = name, "store section is not an array; ignoring it");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Value {
        json!({
            "documentTypes": [
                {"doc_type_key": "final_elec", "display_name": "Final Electrical"},
                {"display_name": "missing key"}
            ],
            "supplementalRequirements": [
                {
                    "municipality_key": "cumberland",
                    "permit_type_key": "ev",
                    "doc_type_key": "final_elec",
                    "active": "true",
                    "rule_definition": "amps >= 50"
                },
                "not a row"
            ],
            "documents": [],
            "projects": [{
                "project_id": "p-1",
                "display_name": "Garage charger",
                "municipality_key": "cumberland",
                "permit_type_key": "ev",
                "created_at": "2026-02-01T09:00:00Z"
            }],
            "projectValues": {"p-1": {"amps": 60}, "p-2": "garbage"}
        })
    }

    #[test]
    fn bad_rows_are_skipped() {
        let snapshot = Snapshot::from_value(&store());
        assert_eq!(snapshot.document_types.len(), 1);
        assert_eq!(snapshot.requirements.len(), 1);
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.project_values.len(), 1);
    }

    #[test]
    fn missing_sections_are_empty() {
        let snapshot = Snapshot::from_value(&json!({"documents": {"oops": true}}));
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(Snapshot::from_value(&json!([1, 2])), Snapshot::default());
    }

    #[test]
    fn attributes_for_unknown_project_is_empty() {
        let snapshot = Snapshot::from_value(&store());
        let p1 = ProjectId::new("p-1").unwrap();
        assert_eq!(snapshot.attributes_for(&p1)["amps"], 60);
        assert!(snapshot
            .attributes_for(&ProjectId::new("p-404").unwrap())
            .is_empty());
    }

    #[test]
    fn project_lookup() {
        let snapshot = Snapshot::from_value(&store());
        let project = snapshot.project(&ProjectId::new("p-1").unwrap()).unwrap();
        assert_eq!(project.display_name.as_deref(), Some("Garage charger"));
        assert!(snapshot.project(&ProjectId::new("p-2").unwrap()).is_none());
    }

    #[test]
    fn checklist_uses_stored_attributes() {
        let snapshot = Snapshot::from_value(&store());
        let query = ChecklistQuery::new(Some("cumberland"), Some("ev"), Some("p-1")).unwrap();
        let checklist = snapshot.checklist(&query);
        assert_eq!(checklist.counts.required, 1);
        assert_eq!(
            checklist.supplements[0].display_name.as_deref(),
            Some("Final Electrical")
        );

        let other = ChecklistQuery::new(Some("cumberland"), Some("ev"), Some("p-2")).unwrap();
        assert!(snapshot.checklist(&other).supplements.is_empty());
    }

    #[test]
    fn format_by_extension() {
        assert_eq!(SnapshotFormat::from_path(Path::new("s.yaml")), SnapshotFormat::Yaml);
        assert_eq!(SnapshotFormat::from_path(Path::new("s.YML")), SnapshotFormat::Yaml);
        assert_eq!(SnapshotFormat::from_path(Path::new("s.json")), SnapshotFormat::Json);
        assert_eq!(SnapshotFormat::from_path(Path::new("snapshot")), SnapshotFormat::Json);
    }

    #[test]
    fn yaml_snapshot_parses() {
        let yaml = r#"
supplementalRequirements:
  - municipality_key: cumberland
    permit_type_key: ev
    doc_type_key: final_elec
    active: 1
    rule_definition:
      key: amps
      operator: gte
      value: 50
projectValues:
  p-1:
    amps: 60
"#;
        let snapshot = Snapshot::from_yaml_str(yaml).unwrap();
        assert_eq!(snapshot.requirements.len(), 1);
        assert!(snapshot.requirements[0].active);
    }
}
