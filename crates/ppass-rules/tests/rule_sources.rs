//! # Rule Source Behavior
//!
//! End-to-end checks of `ppass_rules::evaluate` against the rule encodings
//! catalog authors actually use: bare strings, comparison shorthand,
//! JSON-in-text cells, arrays, and alias-heavy objects.

use ppass_rules::{evaluate, AttributeMap};
use serde_json::{json, Value};

fn attrs(value: Value) -> AttributeMap {
    match value {
        Value::Object(map) => map,
        _ => panic!("test attributes must be an object"),
    }
}

fn none() -> AttributeMap {
    AttributeMap::new()
}

#[test]
fn literal_strings() {
    for attributes in [none(), attrs(json!({"true": false, "false": true}))] {
        assert!(evaluate(&json!(""), &attributes));
        assert!(evaluate(&json!("true"), &attributes));
        assert!(!evaluate(&json!("false"), &attributes));
    }
}

#[test]
fn absent_rule_applies() {
    assert!(evaluate(&Value::Null, &none()));
}

#[test]
fn empty_combinators() {
    assert!(evaluate(&json!({"all": []}), &none()));
    // Empty ANY is true by convention; see the combinator evaluator.
    assert!(evaluate(&json!({"any": []}), &none()));
    assert!(evaluate(&json!({"none": []}), &none()));
    assert!(evaluate(&json!([]), &none()));
}

#[test]
fn type_tolerant_equality() {
    let rule = json!({"key": "amps", "operator": "equals", "value": "50"});
    assert!(evaluate(&rule, &attrs(json!({"amps": 50}))));
    assert!(evaluate(&rule, &attrs(json!({"amps": "50"}))));
    assert!(!evaluate(&rule, &attrs(json!({"amps": 40}))));
}

#[test]
fn existence() {
    let rule = json!({"key": "k", "operator": "exists"});
    assert!(!evaluate(&rule, &none()));
    assert!(!evaluate(&rule, &attrs(json!({"k": ""}))));
    assert!(evaluate(&rule, &attrs(json!({"k": "x"}))));
}

#[test]
fn membership() {
    let rule = json!({"key": "scopes", "operator": "contains", "value": ["ev"]});
    assert!(evaluate(&rule, &attrs(json!({"scopes": ["ev", "deck"]}))));
    assert!(!evaluate(&rule, &attrs(json!({"scopes": ["deck"]}))));
}

#[test]
fn comparison_shorthand() {
    assert!(evaluate(&json!("amps >= 50"), &attrs(json!({"amps": 60}))));
    assert!(!evaluate(&json!("amps >= 50"), &attrs(json!({"amps": 40}))));
    assert!(!evaluate(&json!("amps >= 50"), &none()));
    assert!(evaluate(
        &json!(r#"project_value("Zoning District") = "Residential""#),
        &attrs(json!({"Zoning District": "Residential"}))
    ));
    assert!(!evaluate(
        &json!(r#"project_value("Zoning District") = "Residential""#),
        &none()
    ));
}

#[test]
fn shorthand_on_paths_named_like_project_value() {
    assert!(evaluate(
        &json!("project_value_total >= 100000"),
        &attrs(json!({"project_value_total": 250000}))
    ));
    assert!(evaluate(
        &json!("project_values.amps >= 50"),
        &attrs(json!({"project_values": {"amps": "60"}}))
    ));
}

#[test]
fn substring_uses_authored_text() {
    let rule = |needle: &str| json!({"key": "label", "operator": "contains", "value": needle});
    assert!(!evaluate(&rule("007"), &attrs(json!({"label": "agent 7"}))));
    assert!(evaluate(&rule("007"), &attrs(json!({"label": "Agent 007"}))));
    assert!(evaluate(&rule("1e3"), &attrs(json!({"label": "Charger 1e3 kit"}))));
    assert!(!evaluate(&rule("1e3"), &attrs(json!({"label": "Charger 1000 kit"}))));

    // Membership still compares coerced values.
    assert!(evaluate(&rule("7"), &attrs(json!({"label": [7, 8]}))));
    assert!(evaluate(&rule("true"), &attrs(json!({"label": true}))));
}

#[test]
fn bare_path_truthiness() {
    assert!(evaluate(&json!("site.has_solar"), &attrs(json!({"site": {"has_solar": true}}))));
    assert!(!evaluate(&json!("site.has_solar"), &attrs(json!({"site": {"has_solar": 0}}))));
    assert!(!evaluate(&json!("site.has_solar"), &none()));
}

#[test]
fn json_in_text_cells() {
    let cell = json!(r#"{"any": [{"key": "scope", "in": "ev, solar"}, "has_battery"]}"#);
    assert!(evaluate(&cell, &attrs(json!({"scope": "solar"}))));
    assert!(evaluate(&cell, &attrs(json!({"has_battery": "yes"}))));
    assert!(!evaluate(&cell, &attrs(json!({"scope": "deck"}))));
}

#[test]
fn nested_combinators_with_aliases() {
    let rule = json!({
        "combinator": "and",
        "conditions": [
            {"field": "permit.kind", "op": "one_of", "values": "[\"ev\", \"solar\"]"},
            {"type": "not", "rule": {"attribute": "permit.exempt", "comparator": "truthy"}},
            {"none": [{"path": "site.flood_zone", "presence": "present"}]},
            {"key": "service.amps", "operator": "gte", "threshold": "100"},
        ],
    });
    let passing = attrs(json!({
        "permit": {"kind": "ev", "exempt": false},
        "site": {"flood_zone": ""},
        "service": {"amps": 200},
    }));
    assert!(evaluate(&rule, &passing));

    let mut flooded = passing.clone();
    flooded.insert("site".into(), json!({"flood_zone": "AE"}));
    assert!(!evaluate(&rule, &flooded));

    let mut small_service = passing;
    small_service.insert("service".into(), json!({"amps": "60"}));
    assert!(!evaluate(&rule, &small_service));
}

#[test]
fn malformed_rules_fail_closed() {
    let attributes = attrs(json!({"amps": 60}));
    assert!(!evaluate(&json!({"key": "amps", "operator": "about", "value": 60}), &attributes));
    assert!(!evaluate(&json!({"operator": "gt", "value": 1}), &attributes));
    assert!(!evaluate(&json!({"all": [true, {"bogus": 1}]}), &attributes));
    assert!(!evaluate(&json!("{broken json"), &attributes));
}
