//! # Checklist Composition
//!
//! Joins the supplemental requirement catalog, the document-type catalog,
//! a project's attributes, and its uploaded documents into the list of
//! supplemental documents the project must file.
//!
//! For every active requirement of the queried jurisdiction and permit type
//! whose rule holds, one [`ChecklistResult`] is emitted, in catalog order.
//! A requirement is satisfied when some non-rejected document of its
//! document type exists for the project.

use serde::Serialize;
use tracing::{debug, info};

use ppass_core::{
    DocumentRecord, DocumentType, JurisdictionKey, PermitTypeKey, ProjectId, ProjectRecord,
    ValidationError,
};
use ppass_rules::AttributeMap;

use crate::catalog::Requirement;

/// Query parameter names reported when a checklist query is incomplete.
const JURISDICTION_PARAM: &str = "municipalityKey";
const PERMIT_TYPE_PARAM: &str = "permitTypeKey";
const PROJECT_PARAM: &str = "projectId";

/// A validated checklist query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistQuery {
    /// Jurisdiction to list requirements for.
    pub jurisdiction_key: JurisdictionKey,
    /// Permit type to list requirements for.
    pub permit_type_key: PermitTypeKey,
    /// Project whose attributes and documents are consulted.
    pub project_id: ProjectId,
}

impl ChecklistQuery {
    /// Validate raw query parameters.
    ///
    /// Values are trimmed. When any are absent or blank the error names
    /// every missing parameter, not just the first.
    pub fn new(
        jurisdiction: Option<&str>,
        permit_type: Option<&str>,
        project: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let jurisdiction = jurisdiction.and_then(|v| JurisdictionKey::new(v).ok());
        let permit_type = permit_type.and_then(|v| PermitTypeKey::new(v).ok());
        let project = project.and_then(|v| ProjectId::new(v).ok());

        match (jurisdiction, permit_type, project) {
            (Some(jurisdiction_key), Some(permit_type_key), Some(project_id)) => Ok(Self {
                jurisdiction_key,
                permit_type_key,
                project_id,
            }),
            (j, p, id) => {
                let mut missing = Vec::new();
                if j.is_none() {
                    missing.push(JURISDICTION_PARAM);
                }
                if p.is_none() {
                    missing.push(PERMIT_TYPE_PARAM);
                }
                if id.is_none() {
                    missing.push(PROJECT_PARAM);
                }
                Err(ValidationError::MissingParameters(missing))
            }
        }
    }

    /// Query a stored project's own jurisdiction and permit type.
    pub fn for_project(project: &ProjectRecord) -> Self {
        Self {
            jurisdiction_key: project.jurisdiction_key.clone(),
            permit_type_key: project.permit_type_key.clone(),
            project_id: project.project_id.clone(),
        }
    }
}

/// One applicable requirement on a checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistResult {
    /// The catalog entry, serialized with its catalog columns.
    #[serde(flatten)]
    pub requirement: Requirement,
    /// Display name of the required document type, when catalogued.
    pub display_name: Option<String>,
    /// Whether a non-rejected document of this type exists.
    pub satisfied: bool,
}

/// Summary counts for a checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChecklistCounts {
    /// Number of applicable requirements.
    pub required: usize,
    /// Number of those that are satisfied.
    pub satisfied: usize,
}

/// A composed checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checklist {
    /// Applicable requirements in catalog order.
    pub supplements: Vec<ChecklistResult>,
    /// Totals over `supplements`.
    pub counts: ChecklistCounts,
}

/// Compose the supplemental checklist for `query`.
///
/// Pure over its inputs; `attributes` are the project's attributes (empty
/// when the project has none).
pub fn compose_checklist(
    catalog: &[Requirement],
    document_types: &[DocumentType],
    documents: &[DocumentRecord],
    query: &ChecklistQuery,
    attributes: &AttributeMap,
) -> Checklist {
    let supplements: Vec<ChecklistResult> = catalog
        .iter()
        .filter(|req| req.is_listed_for(&query.jurisdiction_key, &query.permit_type_key))
        .filter(|req| {
            let applies = req.applies_to(attributes);
            debug!(
                document_type = %req.document_type_key,
                applies,
                "evaluated requirement rule"
            );
            applies
        })
        .map(|req| ChecklistResult {
            display_name: document_types
                .iter()
                .find(|dt| dt.document_type_key == req.document_type_key)
                .and_then(|dt| dt.display_name.clone()),
            satisfied: documents
                .iter()
                .any(|doc| doc.satisfies(&req.document_type_key, &query.project_id)),
            requirement: req.clone(),
        })
        .collect();

    let counts = ChecklistCounts {
        required: supplements.len(),
        satisfied: supplements.iter().filter(|r| r.satisfied).count(),
    };

    info!(
        jurisdiction = %query.jurisdiction_key,
        permit_type = %query.permit_type_key,
        project = %query.project_id,
        required = counts.required,
        satisfied = counts.satisfied,
        "composed supplemental checklist"
    );

    Checklist {
        supplements,
        counts,
    }
}
