//! # ppass-rules — Supplemental Requirement Rule Engine
//!
//! Decides whether a supplemental requirement applies to a project. Catalog
//! rules arrive loosely typed (bare strings, arrays, JSON-in-text, or
//! objects using any of a dozen alias field names) and project attributes
//! are an arbitrary nested JSON map.
//!
//! ## Pipeline
//!
//! ```text
//! rule source (serde_json::Value)
//!     │  RuleNode::from_source      normalize.rs + expression.rs
//!     ▼
//! RuleNode tree (closed enum)
//!     │  RuleNode::evaluate         evaluation.rs
//!     │    ├── path::resolve        attribute lookup
//!     │    └── Operand              type-tolerant comparison
//!     ▼
//! bool
//! ```
//!
//! Parsing untrusted rule input and evaluating the trusted tree are separate
//! steps. Callers that evaluate the same rule many times normalize once and
//! keep the [`RuleNode`].
//!
//! ## Guarantees
//!
//! - **Total.** Normalization and evaluation never fail and never panic.
//! - **Fail-closed.** Unresolvable conditions are false; empty or absent
//!   rules are true.
//! - **Pure.** No I/O, no shared state; safe to call from any thread.

pub mod evaluation;
pub mod expression;
pub mod node;
pub mod normalize;
pub mod operand;
pub mod path;

use serde_json::{Map, Value};

pub use node::{CombinatorKind, Comparison, Operator, RuleNode};
pub use operand::Operand;
pub use path::resolve;

/// A project's attributes: a nested JSON object keyed by attribute name.
pub type AttributeMap = Map<String, Value>;

/// Normalize `rule` and evaluate it against `attributes`.
///
/// ```
/// use ppass_rules::{evaluate, AttributeMap};
/// use serde_json::json;
///
/// let attributes: AttributeMap = serde_json::from_value(json!({"amps": "60"})).unwrap();
/// assert!(evaluate(&json!("amps >= 50"), &attributes));
/// assert!(!evaluate(&json!({"key": "amps", "operator": "lt", "value": 50}), &attributes));
/// ```
pub fn evaluate(rule: &Value, attributes: &AttributeMap) -> bool {
    RuleNode::from_source(rule).evaluate(attributes)
}
