//! # Operand Normalization
//!
//! Catalog rules are hand-authored in spreadsheets and forms, while project
//! attributes arrive as structured JSON. Both sides of every equality and
//! membership comparison therefore pass through the same coercion:
//!
//! - strings are trimmed;
//! - `"true"` / `"false"` (any case) become booleans;
//! - strings that fully parse as a finite number become numbers;
//! - arrays normalize element-wise; everything else passes through.
//!
//! [`gather_operands`] collects expected values from the many alias fields a
//! rule object may use. It never fails; unparsable candidates are dropped or
//! kept as text.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};

/// Alias fields that may carry expected values, in collection order.
pub const OPERAND_FIELDS: &[&str] = &[
    "values",
    "value",
    "matches",
    "equals",
    "expected",
    "options",
    "in",
    "oneOf",
    "anyOf",
    "allOf",
    "contains",
    "threshold",
    "expectedValue",
    "target",
    "targets",
];

/// A normalized comparison operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// JSON `null`.
    Null,
    /// Boolean, including `"true"` / `"false"` text.
    Bool(bool),
    /// Finite number, including numeric text. Compared by value.
    Number(f64),
    /// Trimmed text that is neither boolean nor numeric.
    Text(String),
    /// Array with each element normalized.
    List(Vec<Operand>),
    /// Object, compared structurally.
    Map(Map<String, Value>),
}

impl Operand {
    /// Normalize a raw JSON value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::from_text(s),
            Value::Array(items) => Self::List(items.iter().map(Self::from_value).collect()),
            Value::Object(map) => Self::Map(map.clone()),
        }
    }

    /// Normalize a text value.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        match parse_number(trimmed) {
            Some(n) => Self::Number(n),
            None => Self::Text(trimmed.to_string()),
        }
    }

    /// Loose equality used by equality and membership operators.
    ///
    /// Two lists are equal element-wise; a list on one side matches when
    /// any of its elements equals the other side; scalars compare directly.
    pub fn loosely_equals(&self, other: &Operand) -> bool {
        match (self, other) {
            (Self::List(left), Self::List(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right).all(|(l, r)| l.loosely_equals(r))
            }
            (Self::List(left), right) => left.iter().any(|l| l.loosely_equals(right)),
            (left, Self::List(right)) => right.iter().any(|r| left.loosely_equals(r)),
            (left, right) => left == right,
        }
    }

    /// The coerced form of a verbatim operand: text becomes a boolean or
    /// number where it reads as one, lists coerce element-wise.
    pub fn coerced(&self) -> Operand {
        match self {
            Self::Text(s) => Self::from_text(s),
            Self::List(items) => Self::List(items.iter().map(Self::coerced).collect()),
            other => other.clone(),
        }
    }

    /// Numeric view of the operand.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of a scalar operand, used for substring tests.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            _ => None,
        }
    }
}

/// Parse trimmed text as a finite number.
pub fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whether an attribute counts as empty: absent, null, blank text, or an
/// empty array.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Direct boolean coercion of an attribute.
///
/// Absent, null, `false`, zero and the empty string are falsy; every other
/// value, including non-empty text and any array or object, is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Boolean-like reading of a value: booleans and `"true"`/`"false"` text.
pub fn as_bool_like(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match Operand::from_text(s) {
            Operand::Bool(b) => Some(b),
            _ => None,
        },
        _ => None,
    }
}

/// Collect the expected operands of a rule object.
///
/// Candidates come from [`OPERAND_FIELDS`]. Arrays flatten; strings opening
/// with `[` or `{` are tried as JSON; comma-separated strings split into
/// their non-empty parts; nulls and blank strings are dropped.
pub fn gather_operands(rule: &Map<String, Value>) -> Vec<Operand> {
    gather(rule, TextMode::Coerce)
}

/// Like [`gather_operands`], but authored strings stay [`Operand::Text`]
/// exactly as written (trimmed). Substring tests need the authored text:
/// `"007"` must not turn into `7`.
pub fn gather_verbatim_operands(rule: &Map<String, Value>) -> Vec<Operand> {
    gather(rule, TextMode::Verbatim)
}

#[derive(Debug, Clone, Copy)]
enum TextMode {
    Coerce,
    Verbatim,
}

impl TextMode {
    fn text(self, text: &str) -> Operand {
        match self {
            Self::Coerce => Operand::from_text(text),
            Self::Verbatim => Operand::Text(text.trim().to_string()),
        }
    }

    fn value(self, value: &Value) -> Operand {
        match (self, value) {
            (Self::Verbatim, Value::String(s)) => self.text(s),
            (Self::Verbatim, Value::Array(items)) => {
                Operand::List(items.iter().map(|item| self.value(item)).collect())
            }
            _ => Operand::from_value(value),
        }
    }
}

fn gather(rule: &Map<String, Value>, mode: TextMode) -> Vec<Operand> {
    let mut operands = Vec::new();

    for field in OPERAND_FIELDS {
        match rule.get(*field) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => operands.extend(items.iter().map(|v| mode.value(v))),
            Some(Value::String(s)) => gather_text(s, mode, &mut operands),
            Some(other) => operands.push(mode.value(other)),
        }
    }

    operands
}

fn gather_text(text: &str, mode: TextMode, operands: &mut Vec<Operand>) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            match parsed {
                Value::Array(items) => operands.extend(items.iter().map(|v| mode.value(v))),
                other => operands.push(mode.value(&other)),
            }
            return;
        }
        tracing::trace!(candidate = trimmed, "operand looks like JSON but does not parse");
    }

    if trimmed.contains(',') {
        let parts: Vec<&str> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.len() > 1 {
            operands.extend(parts.into_iter().map(|part| mode.text(part)));
            return;
        }
    }

    operands.push(mode.text(trimmed));
}
