//! # Error Hierarchy
//!
//! Validation errors for PermitPass, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! The rule engine itself never fails: malformed rules degrade to a definite
//! boolean. The errors here belong to the boundary: constructing validated
//! keys and checklist queries from caller input.

use thiserror::Error;

/// Validation errors for catalog keys and checklist queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A catalog key was empty or whitespace-only.
    #[error("invalid {kind}: must be non-empty")]
    EmptyKey {
        /// Which key failed (e.g. "jurisdiction key").
        kind: &'static str,
    },

    /// One or more required checklist parameters were absent or blank.
    ///
    /// Carries every missing parameter name so the caller can report them
    /// all at once.
    #[error("{}", missing_parameters_message(.0))]
    MissingParameters(Vec<&'static str>),
}

fn missing_parameters_message(missing: &[&'static str]) -> String {
    let plural = if missing.len() > 1 { "s" } else { "" };
    format!(
        "Missing required query parameter{plural}: {}",
        missing.join(", ")
    )
}
