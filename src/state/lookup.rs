//! Absence-tolerant traversal of nested state trees. A missing intermediate
//! key is a normal outcome, never a panic : callers map `None` to
//! `NotApplicable` or to an empty-value sentinel depending on their policy.

use serde_json::Value;

/// Walk `path` through nested objects. Returns `None` as soon as any key is
/// missing or a non-object is reached mid-path.
pub fn lookup<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = tree;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

pub fn lookup_str<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(tree, path).and_then(|value| value.as_str())
}

pub fn lookup_u64(tree: &Value, path: &[&str]) -> Option<u64> {
    lookup(tree, path).and_then(|value| match value {
        Value::Number(number) => number.as_u64(),
        // Counters frequently arrive as quoted decimal strings in yang-data.
        Value::String(text) => text.parse().ok(),
        _ => None,
    })
}

/// Missing string attributes compare as empty per the check policy.
pub fn lookup_str_or<'a>(tree: &'a Value, path: &[&str], default: &'a str) -> &'a str {
    lookup_str(tree, path).unwrap_or(default)
}

/// Owned copy of the sub-tree at `path`, or `Null` when absent. Used to scope
/// pre/post snapshots to the smallest branch containing a changed attribute.
pub fn subtree(tree: &Value, path: &[&str]) -> Value {
    lookup(tree, path).cloned().unwrap_or(Value::Null)
}
