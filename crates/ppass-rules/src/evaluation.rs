//! # Rule Evaluation
//!
//! Evaluates a normalized [`RuleNode`] tree against a project attribute map.
//!
//! ## Determinism
//!
//! Evaluation reads only its two arguments, allocates no shared state, and
//! performs no I/O. Identical `(RuleNode, AttributeMap)` inputs always yield
//! the identical boolean, and evaluation may run concurrently from any
//! number of threads.
//!
//! ## Fail-closed semantics
//!
//! Absent attributes, type mismatches and failed numeric coercion make a
//! comparison false. Unknown operators never reach this module; they
//! normalize to [`RuleNode::Never`].

use std::cmp::Ordering;

use serde_json::Value;

use crate::node::{CombinatorKind, Comparison, Operator, RuleNode};
use crate::operand::{is_empty, is_truthy, Operand};
use crate::path::resolve;
use crate::AttributeMap;

impl RuleNode {
    /// Evaluate this rule against a project's attributes.
    pub fn evaluate(&self, attributes: &AttributeMap) -> bool {
        match self {
            Self::Literal(value) => *value,
            Self::Always => true,
            Self::Never => false,
            Self::Comparison(comparison) => comparison.evaluate(attributes),
            Self::Combinator { kind, children } => match kind {
                CombinatorKind::All => children.iter().all(|c| c.evaluate(attributes)),
                // An empty ANY holds, matching the vacuous ALL.
                CombinatorKind::Any => {
                    children.is_empty() || children.iter().any(|c| c.evaluate(attributes))
                }
                CombinatorKind::None => !children.iter().any(|c| c.evaluate(attributes)),
            },
            Self::Negation(child) => !child.evaluate(attributes),
        }
    }
}

impl Comparison {
    /// Evaluate this leaf against a project's attributes.
    pub fn evaluate(&self, attributes: &AttributeMap) -> bool {
        let actual = resolve(attributes, &self.key);
        let result = apply(self.operator, actual, &self.operands);
        tracing::trace!(
            key = %self.key,
            operator = %self.operator,
            present = actual.is_some(),
            result,
            "evaluated comparison"
        );
        result
    }
}

fn apply(operator: Operator, actual: Option<&Value>, expected: &[Operand]) -> bool {
    match operator {
        Operator::Equals => {
            if expected.is_empty() {
                is_truthy(actual)
            } else {
                matches_any(actual, expected)
            }
        }
        Operator::NotEquals => expected.is_empty() || !matches_any(actual, expected),
        Operator::In => !expected.is_empty() && matches_any(actual, expected),
        Operator::NotIn => !expected.is_empty() && !matches_any(actual, expected),
        Operator::Contains => contains(actual, expected),
        Operator::NotContains => !contains(actual, expected),
        Operator::GreaterThan => compare_numbers(actual, expected).is_some_and(Ordering::is_gt),
        Operator::GreaterOrEqual => compare_numbers(actual, expected).is_some_and(Ordering::is_ge),
        Operator::LessThan => compare_numbers(actual, expected).is_some_and(Ordering::is_lt),
        Operator::LessOrEqual => compare_numbers(actual, expected).is_some_and(Ordering::is_le),
        Operator::Exists => !is_empty(actual),
        Operator::NotExists => is_empty(actual),
        Operator::Truthy => is_truthy(actual),
        Operator::Falsy => !is_truthy(actual),
        Operator::Always => true,
        Operator::Never => false,
    }
}

/// Whether `actual`, or any element of it when it is an array, loosely
/// equals any expected operand. Absent attributes match nothing.
fn matches_any(actual: Option<&Value>, expected: &[Operand]) -> bool {
    actual.is_some_and(|value| operand_matches(&Operand::from_value(value), expected))
}

fn operand_matches(actual: &Operand, expected: &[Operand]) -> bool {
    match actual {
        Operand::List(items) => items.iter().any(|item| operand_matches(item, expected)),
        _ => expected.iter().any(|e| actual.loosely_equals(e)),
    }
}

/// Substring test for text, membership test for arrays, equality otherwise.
///
/// Substring tests use the operand text as authored; membership and
/// equality compare the coerced operand.
fn contains(actual: Option<&Value>, expected: &[Operand]) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }

    match actual {
        Value::String(text) => {
            let haystack = text.to_lowercase();
            expected.iter().any(|e| {
                e.as_text()
                    .is_some_and(|needle| haystack.contains(&needle.to_lowercase()))
            })
        }
        Value::Array(items) => items.iter().any(|item| {
            let item = Operand::from_value(item);
            expected.iter().any(|e| item.loosely_equals(&e.coerced()))
        }),
        other => {
            let other = Operand::from_value(other);
            expected.iter().any(|e| other.loosely_equals(&e.coerced()))
        }
    }
}

/// Compare `actual` with the first expected operand numerically.
fn compare_numbers(actual: Option<&Value>, expected: &[Operand]) -> Option<Ordering> {
    let left = Operand::from_value(actual?).as_number()?;
    let right = expected.first()?.as_number()?;
    left.partial_cmp(&right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> AttributeMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("test attributes must be an object"),
        }
    }

    fn cmp(key: &str, operator: Operator, operands: Vec<Operand>) -> RuleNode {
        RuleNode::compare(key, operator, operands)
    }

    fn text(s: &str) -> Operand {
        Operand::Text(s.to_string())
    }

    #[test]
    fn equals_tolerates_numeric_text() {
        let rule = cmp("amps", Operator::Equals, vec![Operand::Number(50.0)]);
        assert!(rule.evaluate(&attrs(json!({"amps": 50}))));
        assert!(rule.evaluate(&attrs(json!({"amps": "50"}))));
        assert!(rule.evaluate(&attrs(json!({"amps": " 50.0 "}))));
        assert!(!rule.evaluate(&attrs(json!({"amps": 40}))));
        assert!(!rule.evaluate(&attrs(json!({}))));
    }

    #[test]
    fn equals_tolerates_boolean_text() {
        let rule = cmp("has_solar", Operator::Equals, vec![Operand::Bool(true)]);
        assert!(rule.evaluate(&attrs(json!({"has_solar": "TRUE"}))));
        assert!(rule.evaluate(&attrs(json!({"has_solar": true}))));
        assert!(!rule.evaluate(&attrs(json!({"has_solar": "false"}))));
    }

    #[test]
    fn equals_matches_any_array_element() {
        let rule = cmp("scopes", Operator::Equals, vec![text("deck")]);
        assert!(rule.evaluate(&attrs(json!({"scopes": ["ev", "deck"]}))));
        assert!(!rule.evaluate(&attrs(json!({"scopes": ["ev"]}))));
    }

    #[test]
    fn equals_without_operands_is_truthiness() {
        let rule = cmp("flag", Operator::Equals, vec![]);
        assert!(rule.evaluate(&attrs(json!({"flag": "yes"}))));
        assert!(!rule.evaluate(&attrs(json!({"flag": 0}))));
        assert!(!rule.evaluate(&attrs(json!({}))));
    }

    #[test]
    fn not_equals() {
        let rule = cmp("scope", Operator::NotEquals, vec![text("ev"), text("adu")]);
        assert!(rule.evaluate(&attrs(json!({"scope": "deck"}))));
        assert!(!rule.evaluate(&attrs(json!({"scope": "adu"}))));
        assert!(rule.evaluate(&attrs(json!({}))));
        assert!(cmp("scope", Operator::NotEquals, vec![]).evaluate(&attrs(json!({"scope": "x"}))));
    }

    #[test]
    fn in_and_not_in_require_operands() {
        let empty = attrs(json!({"scope": "ev"}));
        assert!(!cmp("scope", Operator::In, vec![]).evaluate(&empty));
        assert!(!cmp("scope", Operator::NotIn, vec![]).evaluate(&empty));

        let list = vec![text("ev"), text("adu")];
        assert!(cmp("scope", Operator::In, list.clone()).evaluate(&empty));
        assert!(!cmp("scope", Operator::NotIn, list.clone()).evaluate(&empty));
        assert!(cmp("scope", Operator::NotIn, list).evaluate(&attrs(json!({"scope": "deck"}))));
    }

    #[test]
    fn contains_on_text_is_case_insensitive_substring() {
        let rule = cmp("description", Operator::Contains, vec![text("CHARGER")]);
        assert!(rule.evaluate(&attrs(json!({"description": "Level 2 EV charger install"}))));
        assert!(!rule.evaluate(&attrs(json!({"description": "Deck repair"}))));
    }

    #[test]
    fn contains_on_text_uses_numeric_operand_text() {
        let rule = cmp("panel", Operator::Contains, vec![Operand::Number(200.0)]);
        assert!(rule.evaluate(&attrs(json!({"panel": "200A main"}))));
    }

    #[test]
    fn contains_on_text_keeps_numeric_looking_text() {
        let rule = cmp("badge", Operator::Contains, vec![text("007")]);
        assert!(!rule.evaluate(&attrs(json!({"badge": "agent 7"}))));
        assert!(rule.evaluate(&attrs(json!({"badge": "Agent 007"}))));
        let members = cmp("codes", Operator::Contains, vec![text("7")]);
        assert!(members.evaluate(&attrs(json!({"codes": [7, 8]}))));
    }

    #[test]
    fn contains_on_array_is_membership() {
        let rule = cmp("scopes", Operator::Contains, vec![text("ev")]);
        assert!(rule.evaluate(&attrs(json!({"scopes": ["ev", "deck"]}))));
        assert!(!rule.evaluate(&attrs(json!({"scopes": ["evse"]}))));
        let numeric = cmp("sizes", Operator::Contains, vec![Operand::Number(2.0)]);
        assert!(numeric.evaluate(&attrs(json!({"sizes": ["1", "2"]}))));
    }

    #[test]
    fn contains_edge_cases() {
        let rule = cmp("x", Operator::Contains, vec![text("a")]);
        assert!(!rule.evaluate(&attrs(json!({}))));
        assert!(!cmp("x", Operator::Contains, vec![]).evaluate(&attrs(json!({"x": "abc"}))));
        assert!(cmp("x", Operator::Contains, vec![Operand::Number(5.0)])
            .evaluate(&attrs(json!({"x": 5}))));
        assert!(cmp("x", Operator::NotContains, vec![text("a")]).evaluate(&attrs(json!({}))));
        assert!(cmp("x", Operator::NotContains, vec![text("z")])
            .evaluate(&attrs(json!({"x": "abc"}))));
    }

    #[test]
    fn numeric_comparisons() {
        let a = attrs(json!({"amps": "60", "label": "high"}));
        let n = |op, v: f64| cmp("amps", op, vec![Operand::Number(v)]).evaluate(&a);
        assert!(n(Operator::GreaterThan, 50.0));
        assert!(!n(Operator::GreaterThan, 60.0));
        assert!(n(Operator::GreaterOrEqual, 60.0));
        assert!(n(Operator::LessThan, 61.0));
        assert!(n(Operator::LessOrEqual, 60.0));
        assert!(!n(Operator::LessOrEqual, 59.5));
    }

    #[test]
    fn numeric_comparisons_fail_closed() {
        let a = attrs(json!({"label": "high", "flag": true, "list": [60]}));
        let gt = |key: &str, operands| cmp(key, Operator::GreaterThan, operands).evaluate(&a);
        assert!(!gt("label", vec![Operand::Number(1.0)]));
        assert!(!gt("flag", vec![Operand::Number(0.0)]));
        assert!(!gt("list", vec![Operand::Number(1.0)]));
        assert!(!gt("missing", vec![Operand::Number(1.0)]));
        assert!(!gt("label", vec![text("abc")]));
        assert!(!gt("label", vec![]));
    }

    #[test]
    fn existence() {
        let exists = cmp("k", Operator::Exists, vec![]);
        assert!(!exists.evaluate(&attrs(json!({}))));
        assert!(!exists.evaluate(&attrs(json!({"k": ""}))));
        assert!(!exists.evaluate(&attrs(json!({"k": null}))));
        assert!(!exists.evaluate(&attrs(json!({"k": []}))));
        assert!(exists.evaluate(&attrs(json!({"k": "x"}))));
        assert!(exists.evaluate(&attrs(json!({"k": 0}))));
        assert!(cmp("k", Operator::NotExists, vec![]).evaluate(&attrs(json!({"k": "  "}))));
    }

    #[test]
    fn truthy_and_falsy() {
        let a = attrs(json!({"yes": 1, "no": 0}));
        assert!(cmp("yes", Operator::Truthy, vec![]).evaluate(&a));
        assert!(cmp("no", Operator::Falsy, vec![]).evaluate(&a));
        assert!(cmp("missing", Operator::Falsy, vec![]).evaluate(&a));
    }

    #[test]
    fn constant_operators_ignore_attributes() {
        let a = attrs(json!({}));
        assert!(cmp("anything", Operator::Always, vec![]).evaluate(&a));
        assert!(!cmp("anything", Operator::Never, vec![]).evaluate(&a));
    }

    #[test]
    fn combinators() {
        let a = attrs(json!({}));
        let t = || RuleNode::Literal(true);
        let f = || RuleNode::Literal(false);

        assert!(RuleNode::all(vec![t(), t()]).evaluate(&a));
        assert!(!RuleNode::all(vec![t(), f()]).evaluate(&a));
        assert!(RuleNode::any(vec![f(), t()]).evaluate(&a));
        assert!(!RuleNode::any(vec![f(), f()]).evaluate(&a));
        assert!(RuleNode::none(vec![f(), f()]).evaluate(&a));
        assert!(!RuleNode::none(vec![f(), t()]).evaluate(&a));
        assert!(RuleNode::not(f()).evaluate(&a));
    }

    #[test]
    fn empty_combinators_are_vacuously_true() {
        let a = attrs(json!({}));
        assert!(RuleNode::all(vec![]).evaluate(&a));
        assert!(RuleNode::none(vec![]).evaluate(&a));
    }

    /// Empty ANY holds. This deliberately departs from the short-circuit
    /// convention (empty disjunction is false) to preserve catalog behavior.
    #[test]
    fn empty_any_is_true() {
        assert!(RuleNode::any(vec![]).evaluate(&attrs(json!({}))));
    }
}
