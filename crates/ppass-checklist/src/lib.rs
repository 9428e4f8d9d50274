//! # ppass-checklist — Supplemental Document Checklists
//!
//! Builds the per-project list of supplemental documents a permit
//! application must include, and whether each has been provided.
//!
//! ## Modules
//!
//! - [`catalog`]: typed [`Requirement`]s and readers for the loose rows
//!   the catalog importer writes.
//! - [`compose`]: [`ChecklistQuery`] validation and [`compose_checklist`].
//! - [`snapshot`]: loading a point-in-time [`Snapshot`] of the store from
//!   JSON or YAML.
//!
//! Rule evaluation itself lives in `ppass-rules`; this crate only decides
//! which requirements to evaluate and joins the results with documents.

pub mod catalog;
pub mod compose;
pub mod error;
pub mod snapshot;

pub use catalog::{is_truthy_active, FromRecord, Requirement};
pub use compose::{compose_checklist, Checklist, ChecklistCounts, ChecklistQuery, ChecklistResult};
pub use error::{RecordError, SnapshotError};
pub use snapshot::{Snapshot, SnapshotFormat};
