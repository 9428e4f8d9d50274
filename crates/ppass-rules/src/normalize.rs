//! # Rule Normalization
//!
//! Converts an untrusted rule source (a boolean, a string, an array, or an
//! object using any of the alias field names that catalog authors have used
//! over time) into the closed [`RuleNode`] tree. This is the only place that
//! inspects loosely-typed rule input; evaluation works on the tree alone.
//!
//! Normalization is total. Shapes it cannot interpret become
//! [`RuleNode::Never`] so that a malformed rule fails closed.
//!
//! ## Dispatch order for objects
//!
//! 1. `type: always|true` / `type: never|false`
//! 2. `all`, `any`, `none` arrays
//! 3. `not`
//! 4. `type` / `combinator` / `condition` naming `and|all` or `or|any`, with
//!    children from the first array among [`CHILD_FIELDS`]
//! 5. `type: not` with a child from [`NEGATED_FIELDS`]
//! 6. a leaf condition

use serde_json::{Map, Value};

use crate::expression::parse_comparison;
use crate::node::{CombinatorKind, Operator, RuleNode};
use crate::operand::{as_bool_like, gather_operands, gather_verbatim_operands};

/// Nesting beyond this depth normalizes to [`RuleNode::Never`].
pub const MAX_RULE_DEPTH: usize = 64;

/// Fields naming the attribute path of a leaf condition.
pub const KEY_FIELDS: &[&str] = &[
    "project_value_key",
    "projectValueKey",
    "project_values_key",
    "value_key",
    "fact",
    "key",
    "field",
    "path",
    "property",
    "attribute",
];

/// Fields naming the operator of a leaf condition.
pub const OPERATOR_FIELDS: &[&str] = &[
    "operator",
    "op",
    "comparison",
    "comparator",
    "condition",
    "type",
    "presence",
];

/// Fields holding the children of a `type`/`combinator`-style node.
pub const CHILD_FIELDS: &[&str] = &["rules", "conditions", "children", "expressions", "operands"];

/// Fields holding the child of a `type: not` node.
pub const NEGATED_FIELDS: &[&str] =
    &["rule", "condition", "child", "expression", "operand", "value"];

impl RuleNode {
    /// Normalize a rule source. Never fails.
    ///
    /// ```
    /// use ppass_rules::RuleNode;
    /// use serde_json::json;
    ///
    /// assert_eq!(RuleNode::from_source(&json!(null)), RuleNode::Literal(true));
    /// assert_eq!(RuleNode::from_source(&json!("false")), RuleNode::Literal(false));
    /// assert_eq!(RuleNode::from_source(&json!([])), RuleNode::all(vec![]));
    /// ```
    pub fn from_source(source: &Value) -> RuleNode {
        normalize(source, 0)
    }
}

fn normalize(source: &Value, depth: usize) -> RuleNode {
    if depth > MAX_RULE_DEPTH {
        tracing::debug!(depth, "rule nesting too deep; treating as never");
        return RuleNode::Never;
    }

    match source {
        Value::Null => RuleNode::Literal(true),
        Value::Bool(b) => RuleNode::Literal(*b),
        Value::Number(n) => RuleNode::Literal(n.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(s) => normalize_text(s, depth),
        Value::Array(items) => RuleNode::all(normalize_each(items, depth)),
        Value::Object(map) => normalize_object(map, depth),
    }
}

fn normalize_each(items: &[Value], depth: usize) -> Vec<RuleNode> {
    items.iter().map(|item| normalize(item, depth + 1)).collect()
}

fn normalize_text(text: &str, depth: usize) -> RuleNode {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("true") {
        return RuleNode::Literal(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return RuleNode::Literal(false);
    }

    // Spreadsheet cells frequently hold JSON-encoded rule objects.
    if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
        return normalize(&parsed, depth + 1);
    }

    if let Some(comparison) = parse_comparison(trimmed) {
        return RuleNode::Comparison(comparison);
    }

    RuleNode::compare(trimmed, Operator::Truthy, Vec::new())
}

fn normalize_object(rule: &Map<String, Value>, depth: usize) -> RuleNode {
    let kind = lowercase_field(rule, "type");
    let combinator = lowercase_field(rule, "combinator");
    let condition = lowercase_field(rule, "condition");

    match kind.as_deref() {
        Some("always" | "true") => return RuleNode::Always,
        Some("never" | "false") => return RuleNode::Never,
        _ => {}
    }

    for (field, keyed_kind) in [
        ("all", CombinatorKind::All),
        ("any", CombinatorKind::Any),
        ("none", CombinatorKind::None),
    ] {
        if let Some(Value::Array(children)) = rule.get(field) {
            return RuleNode::Combinator {
                kind: keyed_kind,
                children: normalize_each(children, depth),
            };
        }
    }

    if let Some(child) = rule.get("not") {
        return RuleNode::not(normalize(child, depth + 1));
    }

    let names = [kind.as_deref(), combinator.as_deref()];
    let named_kind = if names.iter().any(|n| matches!(n, Some("all" | "and")))
        || condition.as_deref() == Some("and")
    {
        Some(CombinatorKind::All)
    } else if names.iter().any(|n| matches!(n, Some("any" | "or")))
        || condition.as_deref() == Some("or")
    {
        Some(CombinatorKind::Any)
    } else {
        None
    };
    if let Some(named_kind) = named_kind {
        let children = first_array(rule, CHILD_FIELDS)
            .map(|children| normalize_each(children, depth))
            .unwrap_or_default();
        return RuleNode::Combinator {
            kind: named_kind,
            children,
        };
    }

    if kind.as_deref() == Some("not") {
        if let Some(child) = NEGATED_FIELDS.iter().find_map(|f| rule.get(*f)) {
            return RuleNode::not(normalize(child, depth + 1));
        }
    }

    normalize_condition(rule)
}

fn normalize_condition(rule: &Map<String, Value>) -> RuleNode {
    let operator_name = first_string(rule, OPERATOR_FIELDS)
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "equals".to_string());

    let Some(key) = first_string(rule, KEY_FIELDS) else {
        return match operator_name.as_str() {
            "always" | "true" => RuleNode::Always,
            "never" | "false" => RuleNode::Never,
            _ => ["value", "result", "default"]
                .iter()
                .find_map(|f| rule.get(*f).filter(|v| !v.is_null()))
                .and_then(as_bool_like)
                .map_or(RuleNode::Never, RuleNode::Literal),
        };
    };

    match Operator::from_alias(&operator_name) {
        Some(operator @ (Operator::Contains | Operator::NotContains)) => {
            RuleNode::compare(key, operator, gather_verbatim_operands(rule))
        }
        Some(operator) => RuleNode::compare(key, operator, gather_operands(rule)),
        None => {
            tracing::debug!(
                key,
                operator = %operator_name,
                "unrecognized rule operator; condition will never hold"
            );
            RuleNode::Never
        }
    }
}

fn lowercase_field(rule: &Map<String, Value>, field: &str) -> Option<String> {
    rule.get(field)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_ascii_lowercase())
}

fn first_string<'a>(rule: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a str> {
    fields.iter().find_map(|field| {
        rule.get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

fn first_array<'a>(rule: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a Vec<Value>> {
    fields.iter().find_map(|field| rule.get(*field).and_then(Value::as_array))
}
