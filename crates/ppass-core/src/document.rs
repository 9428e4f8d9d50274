//! # Document and Project Records
//!
//! Plain records produced by collaborators outside the checklist core: the
//! document-type catalog (imported), uploaded document records (written by
//! the upload handler) and stored projects. The checklist composer only
//! reads them.

use serde::{Deserialize, Serialize};

use crate::keys::{DocumentTypeKey, JurisdictionKey, PermitTypeKey, ProjectId};

/// A document-type catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    /// Catalog key of this document type.
    #[serde(rename = "doc_type_key", alias = "document_type_key")]
    pub document_type_key: DocumentTypeKey,
    /// Human-readable name shown on the checklist.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Review status of an uploaded document.
///
/// Statuses are free-form strings written by the upload and review flow
/// (`received`, `pending`, `approved`, `rejected`, ...). Only rejection is
/// meaningful to the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentStatus(String);

impl DocumentStatus {
    /// Wrap a status string as written by the upload flow.
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// Access the raw status string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a reviewer rejected the document (trimmed, case-insensitive).
    pub fn is_rejected(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case("rejected")
    }
}

/// An uploaded document attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// The project the document belongs to.
    pub project_id: ProjectId,
    /// The document type the upload was filed under.
    #[serde(rename = "doc_type_key", alias = "document_type_key")]
    pub document_type_key: DocumentTypeKey,
    /// Review status; `None` when the upload flow recorded no string status.
    #[serde(default)]
    pub status: Option<DocumentStatus>,
}

impl DocumentRecord {
    /// Whether this document satisfies a requirement for `document_type_key`
    /// on `project_id`.
    ///
    /// A document satisfies when both keys match and it has not been
    /// rejected. Documents without a status count as satisfying.
    pub fn satisfies(&self, document_type_key: &DocumentTypeKey, project_id: &ProjectId) -> bool {
        self.document_type_key == *document_type_key
            && self.project_id == *project_id
            && !self.status.as_ref().is_some_and(DocumentStatus::is_rejected)
    }
}

/// A stored permitting project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Optional human-readable project name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Jurisdiction the project is filed in.
    #[serde(rename = "municipality_key", alias = "jurisdiction_key")]
    pub jurisdiction_key: JurisdictionKey,
    /// Permit type the project applies for.
    pub permit_type_key: PermitTypeKey,
    /// Creation timestamp as recorded by the persistence layer.
    pub created_at: String,
}
