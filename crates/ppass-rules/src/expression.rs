//! # Comparison Shorthand
//!
//! Catalog spreadsheets often carry rules as a single comparison string
//! rather than a structured object:
//!
//! ```text
//! ev_breaker_amps >= 50
//! project_value("Zoning District") = "Residential"
//! scope != deck
//! ```
//!
//! The left side is an attribute path or a `project_value("...")` call; the
//! right side is a number, a quoted string, `true`/`false`, or a bare word.
//! Anything that does not fit returns `None` and the caller falls back to a
//! path truthiness check.

use crate::node::{Comparison, Operator};
use crate::operand::Operand;

/// Symbols recognized between the two sides, longest first.
const SYMBOLS: &[&str] = &["===", "!==", ">=", "<=", "!=", "==", "<>", ">", "<", "="];

/// Parse `lhs OP rhs`.
pub fn parse_comparison(text: &str) -> Option<Comparison> {
    let text = text.trim();
    let (key, rest) = parse_lhs(text)?;

    let rest = rest.trim_start();
    let symbol = SYMBOLS.iter().find(|s| rest.starts_with(**s))?;
    let operator = Operator::from_alias(symbol)?;

    let operand = parse_rhs(rest[symbol.len()..].trim())?;

    Some(Comparison {
        key,
        operator,
        operands: vec![operand],
    })
}

fn parse_lhs(text: &str) -> Option<(String, &str)> {
    // `project_value_total` and `project_values.amps` are plain paths.
    let call = text
        .strip_prefix("project_value")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('));
    if let Some(call) = call {
        let call = call.trim_start();
        let (name, after) = split_quoted(call)?;
        let after = after.trim_start().strip_prefix(')')?;
        let name = name.trim();
        return (!name.is_empty()).then(|| (name.to_string(), after));
    }

    let end = text.find(['<', '>', '=', '!'])?;
    let key = text[..end].trim();
    if key.is_empty() || key.contains(['"', '\'']) {
        return None;
    }
    Some((key.to_string(), &text[end..]))
}

fn parse_rhs(text: &str) -> Option<Operand> {
    if text.is_empty() {
        return None;
    }
    if text.starts_with(['"', '\'']) {
        let (inner, after) = split_quoted(text)?;
        return after.trim().is_empty().then(|| Operand::from_text(inner));
    }
    if text.contains(['<', '>', '=', '!', '"', '\'']) {
        return None;
    }
    Some(Operand::from_text(text))
}

/// Split a leading quoted string from the rest. No escape sequences.
fn split_quoted(text: &str) -> Option<(&str, &str)> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &text[1..];
    let close = body.find(quote)?;
    Some((&body[..close], &body[close + 1..]))
}
