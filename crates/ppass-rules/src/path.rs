//! # Attribute Path Resolution
//!
//! Resolves dotted/bracketed paths against a project attribute map.
//!
//! ```text
//! electrical.service.amps        nested keys
//! scopes[0]  /  scopes.0         array index
//! meta["zoning.district"]        quoted key (may contain dots)
//! ```
//!
//! Resolution never fails. A missing key, an out-of-range index, indexing
//! into a scalar, or malformed bracket syntax all resolve to `None`
//! (absent), which is distinct from `Some(Value::Null)`.

use serde_json::Value;

use crate::AttributeMap;

/// One step of a parsed attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key. Also indexes arrays when the key is a decimal number.
    Key(String),
    /// Bracketed array index.
    Index(usize),
}

/// Resolve `path` against `attributes`.
///
/// If the whole trimmed path names a top-level attribute it is returned
/// directly, so attribute names containing dots or spaces stay addressable.
pub fn resolve<'a>(attributes: &'a AttributeMap, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if let Some(value) = attributes.get(path) {
        return Some(value);
    }

    let segments = parse_path(path)?;
    let (first, rest) = segments.split_first()?;
    let mut current = match first {
        PathSegment::Key(key) => attributes.get(key)?,
        PathSegment::Index(_) => return None,
    };
    for segment in rest {
        current = step(current, segment)?;
    }
    Some(current)
}

fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Key(key)) => items.get(key.parse::<usize>().ok()?),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Parse a path into segments. Returns `None` for malformed bracket syntax.
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => flush(&mut buffer, &mut segments),
            '[' => {
                flush(&mut buffer, &mut segments);
                segments.push(parse_bracket(&mut chars)?);
            }
            ']' => return None,
            _ => buffer.push(c),
        }
    }
    flush(&mut buffer, &mut segments);

    Some(segments)
}

fn flush(buffer: &mut String, segments: &mut Vec<PathSegment>) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        segments.push(PathSegment::Key(trimmed.to_string()));
    }
    buffer.clear();
}

/// Parse the inside of `[...]`; the opening bracket is already consumed.
fn parse_bracket(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<PathSegment> {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }

    match chars.peek().copied() {
        Some(quote @ ('"' | '\'')) => {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next()? {
                    c if c == quote => break,
                    c => key.push(c),
                }
            }
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            (chars.next()? == ']').then_some(PathSegment::Key(key))
        }
        _ => {
            let mut raw = String::new();
            loop {
                match chars.next()? {
                    ']' => break,
                    c => raw.push(c),
                }
            }
            raw.trim().parse::<usize>().ok().map(PathSegment::Index)
        }
    }
}
