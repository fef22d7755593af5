//! Nested get/set/forget over a value tree.
//!
//! Reads and deletes of missing paths never fail: a read returns `None` or
//! the caller's fallback, a delete does nothing.

use std::fmt;

use serde_json::Value;

use super::path::{parse_segments, Segment};
use super::Table;

/// Value returned by [`query`] when the path is missing.
///
/// `Lazy` producers run only on a miss.
pub enum Fallback {
    Value(Value),
    Lazy(Box<dyn FnOnce() -> Value>),
}

impl Fallback {
    pub fn lazy(producer: impl FnOnce() -> Value + 'static) -> Self {
        Fallback::Lazy(Box::new(producer))
    }

    fn resolve(self) -> Value {
        match self {
            Fallback::Value(value) => value,
            Fallback::Lazy(producer) => producer(),
        }
    }
}

impl Default for Fallback {
    fn default() -> Self {
        Fallback::Value(Value::Null)
    }
}

impl From<Value> for Fallback {
    fn from(value: Value) -> Self {
        Fallback::Value(value)
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Fallback::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Looks up a dot-path.
pub fn lookup<'a>(tree: &'a Table, key: &str) -> Option<&'a Value> {
    lookup_segments(tree, &parse_segments(key))
}

pub fn lookup_segments<'a>(tree: &'a Table, path: &[Segment]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = tree.get(first.key()?)?;

    for segment in rest {
        current = child(current, segment.key()?)?;
    }

    Some(current)
}

/// Owned lookup. No query returns the whole tree; a miss returns the fallback.
///
/// A stored `null` is a hit.
pub fn query(tree: &Table, key: Option<&str>, default: Fallback) -> Value {
    let Some(key) = key else {
        return Value::Object(tree.clone());
    };

    match lookup(tree, key) {
        Some(value) => value.clone(),
        None => default.resolve(),
    }
}

/// True when the path holds a non-null value.
pub fn has(tree: &Table, key: &str) -> bool {
    lookup(tree, key).is_some_and(|value| !value.is_null())
}

/// Writes `value` at a dot-path.
pub fn set(tree: &mut Table, key: &str, value: Value) {
    merge_at_path(tree, &parse_segments(key), value);
}

/// Search-and-replace merge at `path`.
///
/// Mapping meets mapping: merged recursively. Anything else: the incoming
/// value replaces what was there, including non-mapping intermediates.
pub fn merge_at_path(table: &mut Table, path: &[Segment], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Object(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    let key = match first {
        Segment::Key(key) => key.clone(),
        Segment::Append => next_index(table),
    };

    let slot = table.entry(key).or_insert(Value::Null);
    merge_into(slot, rest, value);
}

/// Removes the leaf at a dot-path. Missing intermediates are a no-op.
pub fn forget(tree: &mut Table, key: &str) {
    let segments = parse_segments(key);
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let Some(last) = last.key() else {
        return;
    };

    if parents.is_empty() {
        tree.shift_remove(last);
        return;
    }

    if let Some(parent) = lookup_mut(tree, parents) {
        remove_child(parent, last);
    }
}

/// Recursively merges `overlay` into `base`.
///
/// Nested mappings merge; scalars and sequences replace.
pub fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(base_table)), Value::Object(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_into(node: &mut Value, path: &[Segment], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        match (node, value) {
            (Value::Object(base), Value::Object(overlay)) => deep_merge(base, overlay),
            (node, value) => *node = value,
        }
        return;
    };

    match first {
        Segment::Key(key) => {
            if let Value::Array(items) = node {
                let index = key.parse::<usize>().ok();
                if index == Some(items.len()) {
                    items.push(Value::Null);
                }
                if let Some(child) = index.and_then(|i| items.get_mut(i)) {
                    merge_into(child, rest, value);
                    return;
                }
                // any other key turns the sequence into an index-keyed mapping
                let entries = std::mem::take(items)
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item))
                    .collect();
                *node = Value::Object(entries);
            }

            if !node.is_object() {
                *node = Value::Object(Table::new());
            }
            if let Value::Object(table) = node {
                let slot = table.entry(key.clone()).or_insert(Value::Null);
                merge_into(slot, rest, value);
            }
        }
        Segment::Append => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            if let Value::Array(items) = node {
                items.push(Value::Null);
                if let Some(slot) = items.last_mut() {
                    merge_into(slot, rest, value);
                }
            }
        }
    }
}

fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Object(table) => table.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(table) => table.get_mut(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

fn lookup_mut<'a>(tree: &'a mut Table, path: &[Segment]) -> Option<&'a mut Value> {
    let (first, rest) = path.split_first()?;
    let mut current = tree.get_mut(first.key()?)?;

    for segment in rest {
        current = child_mut(current, segment.key()?)?;
    }

    Some(current)
}

fn remove_child(node: &mut Value, key: &str) {
    match node {
        Value::Object(table) => {
            table.shift_remove(key);
        }
        Value::Array(items) => {
            if let Some(index) = key.parse::<usize>().ok().filter(|i| *i < items.len()) {
                items.remove(index);
            }
        }
        _ => {}
    }
}

/// Next integer key for a root-level append: one past the largest numeric key.
fn next_index(table: &Table) -> String {
    table
        .keys()
        .filter_map(|key| key.parse::<usize>().ok())
        .max()
        .map_or(0, |max| max + 1)
        .to_string()
}
