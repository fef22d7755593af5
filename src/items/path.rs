//! Dot-notation key parsing and segment expansion.
//!
//! `"app.views.home"` addresses `items["app"]["views"]["home"]`. A segment
//! ending in `[]` (`"providers[]"`) pushes onto the sequence at that path
//! instead of naming a key.

use serde_json::Value;

use super::Table;

/// One step of a parsed dot-path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A mapping key, or a sequence index when the node is a sequence.
    Key(String),
    /// Push onto the sequence at this position.
    Append,
}

impl Segment {
    pub fn key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Append => None,
        }
    }
}

/// Splits a dot-path into segments.
///
/// The empty key yields a single empty-string segment.
pub fn parse_segments(key: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for part in key.split('.') {
        match part.strip_suffix("[]") {
            Some(name) => {
                if !name.is_empty() {
                    segments.push(Segment::Key(name.to_string()));
                }
                segments.push(Segment::Append);
            }
            None => segments.push(Segment::Key(part.to_string())),
        }
    }

    segments
}

/// Turns a dotted write into a single root-level entry.
///
/// `("a.b.c", v)` becomes `("a", {"b": {"c": v}})`. A key without dots is
/// returned unchanged. An append segment wraps the inner value in a
/// one-element sequence.
pub fn expand_segments(key: &str, value: Value) -> (String, Value) {
    let segments = parse_segments(key);
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return (key.to_string(), value),
    };

    let mut nested = value;
    for segment in rest.iter().rev() {
        nested = wrap(segment, nested);
    }

    match first {
        Segment::Key(root) => (root.clone(), nested),
        // a leading `[]` has no name to hang the sequence on
        Segment::Append => (String::new(), Value::Array(vec![nested])),
    }
}

fn wrap(segment: &Segment, value: Value) -> Value {
    match segment {
        Segment::Key(key) => {
            let mut table = Table::new();
            table.insert(key.clone(), value);
            Value::Object(table)
        }
        Segment::Append => Value::Array(vec![value]),
    }
}
