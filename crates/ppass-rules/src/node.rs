//! # Canonical Rule Tree
//!
//! The closed set of node and operator types every rule source normalizes
//! into. Evaluation matches on these exhaustively, so adding an operator is a
//! compile error until every evaluation path handles it.

use std::fmt;

use serde::Serialize;

use crate::operand::Operand;

/// A normalized rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleNode {
    /// A boolean constant authored as a literal.
    Literal(bool),
    /// Constant true, authored as `always`.
    Always,
    /// Constant false. Also the result of every unrecognized leaf shape.
    Never,
    /// A leaf comparison against one project attribute.
    Comparison(Comparison),
    /// ALL / ANY / NONE over child rules.
    Combinator {
        /// Which combinator.
        kind: CombinatorKind,
        /// Child rules in authored order.
        children: Vec<RuleNode>,
    },
    /// Logical NOT.
    Negation(Box<RuleNode>),
}

/// A leaf comparison: `resolve(attributes, key) <operator> operands`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Attribute path (see [`crate::path`]).
    pub key: String,
    /// Comparison operator.
    pub operator: Operator,
    /// Expected values, already normalized.
    pub operands: Vec<Operand>,
}

/// Combinator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinatorKind {
    /// Every child must hold.
    All,
    /// At least one child must hold. An empty ANY holds.
    Any,
    /// No child may hold.
    None,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Actual matches any expected value.
    Equals,
    /// Actual matches no expected value.
    NotEquals,
    /// Like `Equals`, but an empty expected list never holds.
    In,
    /// Like `NotEquals`, but an empty expected list never holds.
    NotIn,
    /// Substring (text) or membership (array) test.
    Contains,
    /// Negation of `Contains`.
    NotContains,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `>=`.
    GreaterOrEqual,
    /// Numeric `<`.
    LessThan,
    /// Numeric `<=`.
    LessOrEqual,
    /// Attribute is present and non-blank.
    Exists,
    /// Attribute is absent or blank.
    NotExists,
    /// Attribute coerces to true.
    Truthy,
    /// Attribute coerces to false.
    Falsy,
    /// Constant true.
    Always,
    /// Constant false.
    Never,
}

impl Operator {
    /// Parse an authored operator name (case-insensitive, trimmed).
    ///
    /// Returns `None` for names outside the alias table; callers treat that
    /// as a rule that never holds.
    pub fn from_alias(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let op = match lower.as_str() {
            "equals" | "eq" | "==" | "=" | "===" | "is" => Self::Equals,
            "not_equals" | "not-equals" | "ne" | "neq" | "!=" | "!==" | "<>" | "is_not" => {
                Self::NotEquals
            }
            "in" | "one_of" | "includes" | "any_of" => Self::In,
            "not_in" | "none_of" | "excludes" => Self::NotIn,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "greater_than" | "gt" | ">" => Self::GreaterThan,
            "greater_than_or_equal" | "greater_or_equal" | "gte" | "ge" | ">=" => {
                Self::GreaterOrEqual
            }
            "less_than" | "lt" | "<" => Self::LessThan,
            "less_than_or_equal" | "less_or_equal" | "lte" | "le" | "<=" => Self::LessOrEqual,
            "exists" | "present" | "defined" | "is_defined" | "is_not_blank" => Self::Exists,
            "not_exists" | "absent" | "undefined" | "is_blank" | "missing" => Self::NotExists,
            "truthy" => Self::Truthy,
            "falsy" => Self::Falsy,
            "always" | "true" => Self::Always,
            "never" | "false" => Self::Never,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::GreaterThan => "greater_than",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::LessThan => "less_than",
            Self::LessOrEqual => "less_or_equal",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
            Self::Truthy => "truthy",
            Self::Falsy => "falsy",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RuleNode {
    /// Build an ALL node.
    pub fn all(children: Vec<RuleNode>) -> Self {
        Self::Combinator {
            kind: CombinatorKind::All,
            children,
        }
    }

    /// Build an ANY node.
    pub fn any(children: Vec<RuleNode>) -> Self {
        Self::Combinator {
            kind: CombinatorKind::Any,
            children,
        }
    }

    /// Build a NONE node.
    pub fn none(children: Vec<RuleNode>) -> Self {
        Self::Combinator {
            kind: CombinatorKind::None,
            children,
        }
    }

    /// Build a negation.
    pub fn not(child: RuleNode) -> Self {
        Self::Negation(Box::new(child))
    }

    /// Build a leaf comparison.
    pub fn compare(key: impl Into<String>, operator: Operator, operands: Vec<Operand>) -> Self {
        Self::Comparison(Comparison {
            key: key.into(),
            operator,
            operands,
        })
    }

    /// Height of the tree; leaves have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Combinator { children, .. } => {
                1 + children.iter().map(RuleNode::depth).max().unwrap_or(0)
            }
            Self::Negation(child) => 1 + child.depth(),
            _ => 1,
        }
    }
}
