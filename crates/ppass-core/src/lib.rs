#![deny(missing_docs)]

//! # ppass-core — Foundational Types for PermitPass
//!
//! This crate defines the types every other crate in the workspace shares.
//! It has no internal crate dependencies, only `serde` and `thiserror` from
//! the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for catalog keys.** A [`JurisdictionKey`] cannot be
//!    passed where a [`DocumentTypeKey`] is expected. Every key is trimmed and
//!    validated non-empty at construction.
//!
//! 2. **Records are point-in-time values.** [`DocumentType`],
//!    [`DocumentRecord`] and [`ProjectRecord`] are plain owned data handed to
//!    the checklist composer by whatever persistence layer produced them.
//!
//! 3. **[`ValidationError`] at the boundary.** Structured errors with
//!    `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod keys;

// Re-export primary types at crate root for ergonomic imports.
pub use document::{DocumentRecord, DocumentStatus, DocumentType, ProjectRecord};
pub use error::ValidationError;
pub use keys::{DocumentTypeKey, JurisdictionKey, PermitTypeKey, ProjectId};
