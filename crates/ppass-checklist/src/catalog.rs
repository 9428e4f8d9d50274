//! # Catalog Records
//!
//! Typed views of the loosely-typed rows that the CSV importer and upload
//! handler write into the store. Rows are JSON objects whose cells are
//! usually strings; column names vary between catalog versions, so each
//! field is read from a list of aliases.
//!
//! A row missing a required key is rejected with a [`RecordError`]; the
//! snapshot reader logs and skips it, so one bad row never hides the rest
//! of the catalog.

use serde::Serialize;
use serde_json::{Map, Value};

use ppass_core::{
    DocumentRecord, DocumentStatus, DocumentType, DocumentTypeKey, JurisdictionKey, PermitTypeKey,
    ProjectId, ProjectRecord, ValidationError,
};
use ppass_rules::{AttributeMap, RuleNode};

use crate::error::RecordError;

const JURISDICTION_FIELDS: &[&str] = &["municipality_key", "jurisdiction_key", "jurisdiction"];
const PERMIT_TYPE_FIELDS: &[&str] = &["permit_type_key", "permit_type"];
const DOCUMENT_TYPE_FIELDS: &[&str] = &["doc_type_key", "document_type_key", "document_type"];
const RULE_FIELDS: &[&str] = &["rule_definition", "ruleDefinition", "rule"];
/// Columns the checklist output writes itself; never passed through.
const RESERVED_FIELDS: &[&str] = &["active", "display_name", "satisfied"];

/// A supplemental requirement: a jurisdiction- and permit-type-specific
/// document obligation, applicable only when its rule holds for a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    /// Jurisdiction the requirement belongs to.
    #[serde(rename = "municipality_key")]
    pub jurisdiction_key: JurisdictionKey,
    /// Permit type the requirement belongs to.
    pub permit_type_key: PermitTypeKey,
    /// Document type that satisfies the requirement.
    #[serde(rename = "doc_type_key")]
    pub document_type_key: DocumentTypeKey,
    /// Inactive requirements never appear on a checklist.
    pub active: bool,
    /// The rule exactly as authored.
    #[serde(rename = "rule_definition")]
    pub rule_source: Value,
    /// The normalized rule.
    #[serde(skip)]
    pub rule: RuleNode,
    /// Remaining catalog columns (notes, citations, ...), passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Requirement {
    /// Build an active requirement, normalizing `rule_source`.
    pub fn new(
        jurisdiction_key: JurisdictionKey,
        permit_type_key: PermitTypeKey,
        document_type_key: DocumentTypeKey,
        rule_source: Value,
    ) -> Self {
        let rule = RuleNode::from_source(&rule_source);
        Self {
            jurisdiction_key,
            permit_type_key,
            document_type_key,
            active: true,
            rule_source,
            rule,
            extra: Map::new(),
        }
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether this requirement is active and belongs to the given
    /// jurisdiction and permit type.
    pub fn is_listed_for(
        &self,
        jurisdiction: &JurisdictionKey,
        permit_type: &PermitTypeKey,
    ) -> bool {
        self.active
            && self.jurisdiction_key == *jurisdiction
            && self.permit_type_key == *permit_type
    }

    /// Whether the requirement's rule holds for a project.
    pub fn applies_to(&self, attributes: &AttributeMap) -> bool {
        self.rule.evaluate(attributes)
    }
}

/// Conversion from a loose store row.
pub trait FromRecord: Sized {
    /// Read `record`, or explain why it cannot be used.
    fn from_record(record: &Value) -> Result<Self, RecordError>;
}

impl FromRecord for Requirement {
    fn from_record(record: &Value) -> Result<Self, RecordError> {
        let row = as_object(record)?;

        let jurisdiction_key =
            read_key(row, JURISDICTION_FIELDS, "municipality_key", JurisdictionKey::new)?;
        let permit_type_key =
            read_key(row, PERMIT_TYPE_FIELDS, "permit_type_key", PermitTypeKey::new)?;
        let document_type_key =
            read_key(row, DOCUMENT_TYPE_FIELDS, "doc_type_key", DocumentTypeKey::new)?;

        let rule_source = RULE_FIELDS
            .iter()
            .find_map(|f| row.get(*f).filter(|v| !v.is_null()))
            .cloned()
            .unwrap_or(Value::Null);

        let mut extra = row.clone();
        for field in JURISDICTION_FIELDS
            .iter()
            .chain(PERMIT_TYPE_FIELDS)
            .chain(DOCUMENT_TYPE_FIELDS)
            .chain(RULE_FIELDS)
            .chain(RESERVED_FIELDS)
        {
            extra.remove(*field);
        }

        let mut requirement = Requirement::new(
            jurisdiction_key,
            permit_type_key,
            document_type_key,
            rule_source,
        )
        .with_active(is_truthy_active(row.get("active")));
        requirement.extra = extra;
        Ok(requirement)
    }
}

impl FromRecord for DocumentType {
    fn from_record(record: &Value) -> Result<Self, RecordError> {
        let row = as_object(record)?;
        let document_type_key =
            read_key(row, DOCUMENT_TYPE_FIELDS, "doc_type_key", DocumentTypeKey::new)?;
        Ok(DocumentType {
            document_type_key,
            display_name: row
                .get("display_name")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

impl FromRecord for DocumentRecord {
    fn from_record(record: &Value) -> Result<Self, RecordError> {
        let row = as_object(record)?;
        let project_id = read_key(row, &["project_id"], "project_id", ProjectId::new)?;
        let document_type_key =
            read_key(row, DOCUMENT_TYPE_FIELDS, "doc_type_key", DocumentTypeKey::new)?;
        Ok(DocumentRecord {
            project_id,
            document_type_key,
            status: row
                .get("status")
                .and_then(Value::as_str)
                .map(DocumentStatus::new),
        })
    }
}

impl FromRecord for ProjectRecord {
    fn from_record(record: &Value) -> Result<Self, RecordError> {
        let row = as_object(record)?;
        let text = |field: &'static str| {
            row.get(field)
                .and_then(Value::as_str)
                .ok_or(RecordError::MissingField(field))
        };

        Ok(ProjectRecord {
            project_id: ProjectId::new(text("project_id")?)
                .map_err(|_| RecordError::MissingField("project_id"))?,
            display_name: row
                .get("display_name")
                .and_then(Value::as_str)
                .map(str::to_string),
            jurisdiction_key: JurisdictionKey::new(text("municipality_key")?)
                .map_err(|_| RecordError::MissingField("municipality_key"))?,
            permit_type_key: PermitTypeKey::new(text("permit_type_key")?)
                .map_err(|_| RecordError::MissingField("permit_type_key"))?,
            created_at: text("created_at")?.to_string(),
        })
    }
}

/// Spreadsheet-style active flag: `true`, `"true"`, `"1"` or `1`.
/// Anything else, including a missing column, is inactive.
pub fn is_truthy_active(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

fn as_object(record: &Value) -> Result<&Map<String, Value>, RecordError> {
    record.as_object().ok_or(RecordError::NotAnObject)
}

/// Read a required key column and validate it with `new`.
fn read_key<K>(
    row: &Map<String, Value>,
    fields: &[&str],
    name: &'static str,
    new: impl FnOnce(String) -> Result<K, ValidationError>,
) -> Result<K, RecordError> {
    new(required_key(row, fields, name)?).map_err(|_| RecordError::MissingField(name))
}

/// First non-blank string or number among `fields`, as text.
fn required_key(
    row: &Map<String, Value>,
    fields: &[&str],
    name: &'static str,
) -> Result<String, RecordError> {
    fields
        .iter()
        .find_map(|field| match row.get(*field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or(RecordError::MissingField(name))
}
