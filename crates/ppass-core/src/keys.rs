//! # Catalog Key Newtypes
//!
//! Domain-primitive newtypes for the keys that tie the requirement catalog,
//! the document-type catalog, uploaded documents and projects together.
//! Each key is a distinct type; you cannot pass a [`PermitTypeKey`] where a
//! [`JurisdictionKey`] is expected.
//!
//! ## Validation
//!
//! Keys are trimmed at construction and must be non-empty. Matching between
//! keys is exact after trimming; no case folding is applied because catalog
//! keys are machine identifiers (`cumberland`, `ev`, `final_elec`).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! catalog_key {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a key from a string, trimming whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyKey`] if the string is empty
            /// or whitespace-only.
            pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyKey { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Access the key string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> String {
                key.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

catalog_key!(
    /// The municipality or town administering a permitting process
    /// (e.g. `cumberland`). Older catalogs call this the municipality key.
    JurisdictionKey,
    "jurisdiction key"
);

catalog_key!(
    /// The category of permitted work (e.g. `ev` for an EV charger install,
    /// `adu` for an accessory dwelling unit).
    PermitTypeKey,
    "permit type key"
);

catalog_key!(
    /// The kind of required artifact (e.g. `final_elec`, `wiring_diagram`).
    DocumentTypeKey,
    "document type key"
);

catalog_key!(
    /// A permitting project. Stored projects may carry numeric ids; they are
    /// compared by their decimal string form.
    ProjectId,
    "project id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_trimmed() {
        let key = JurisdictionKey::new("  cumberland ").unwrap();
        assert_eq!(key.as_str(), "cumberland");
        assert_eq!(key.to_string(), "cumberland");
    }

    #[test]
    fn blank_keys_are_rejected() {
        assert_eq!(
            PermitTypeKey::new("   ").unwrap_err(),
            ValidationError::EmptyKey {
                kind: "permit type key"
            }
        );
        assert!(DocumentTypeKey::new("").is_err());
        assert!(ProjectId::new("\t").is_err());
    }

    #[test]
    fn keys_compare_exactly_after_trim() {
        assert_eq!(
            DocumentTypeKey::new("final_elec").unwrap(),
            DocumentTypeKey::new(" final_elec").unwrap()
        );
        assert_ne!(
            DocumentTypeKey::new("final_elec").unwrap(),
            DocumentTypeKey::new("FINAL_ELEC").unwrap()
        );
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let key: ProjectId = serde_json::from_str("\" p-1 \"").unwrap();
        assert_eq!(key.as_str(), "p-1");
        assert!(serde_json::from_str::<ProjectId>("\"  \"").is_err());
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"p-1\"");
    }
}
