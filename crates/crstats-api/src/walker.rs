//! Depth-first traversal of an untyped JSON document.

use serde_json::Value;

/// Where a visited value sits inside its parent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// An object entry, identified by its key.
    Key(&'a str),
    /// An array element, identified by its position.
    Index(usize),
}

impl<'a> Slot<'a> {
    /// The key, when the value is an object entry.
    pub const fn key(self) -> Option<&'a str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Index(_) => None,
        }
    }

    /// The index, when the value is an array element.
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Key(_) => None,
            Self::Index(index) => Some(index),
        }
    }
}

/// Visits every object entry and every array element below `value`, depth first.
///
/// `visit` is called for a child before the walk descends into it. Scalars are
/// leaves: they are reported once by their parent and never descended into, so a
/// scalar root produces no calls at all. Object entries are reported in the map's
/// iteration order, which callers must not rely on.
pub fn walk<'a, F>(value: &'a Value, visit: &mut F)
where
    F: FnMut(Slot<'a>, &'a Value),
{
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                visit(Slot::Key(key), child);
                walk(child, visit);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                visit(Slot::Index(index), child);
                walk(child, visit);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Renders a JSON value for display: strings verbatim, `null` as `N/A`, anything
/// else in its compact JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}
