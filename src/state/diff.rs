//! Structural diff between two nested state trees : the set of paths where
//! values changed, keys appeared or keys disappeared.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

impl std::fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => {
                write!(f, "~ {}: {} -> {}", self.path, before, after)
            }
            (None, Some(after)) => write!(f, "+ {}: {}", self.path, after),
            (Some(before), None) => write!(f, "- {}: {}", self.path, before),
            (None, None) => write!(f, "? {}", self.path),
        }
    }
}

/// Diffing two identical trees yields an empty result.
pub fn structural_diff(pre: &Value, post: &Value) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    walk(pre, post, String::new(), &mut entries);
    entries
}

fn walk(pre: &Value, post: &Value, path: String, entries: &mut Vec<DiffEntry>) {
    match (pre, post) {
        (Value::Object(pre_map), Value::Object(post_map)) => {
            for (key, pre_value) in pre_map {
                let child_path = join(&path, key);
                match post_map.get(key) {
                    Some(post_value) => walk(pre_value, post_value, child_path, entries),
                    None => entries.push(DiffEntry {
                        path: child_path,
                        before: Some(pre_value.clone()),
                        after: None,
                    }),
                }
            }
            for (key, post_value) in post_map {
                if !pre_map.contains_key(key) {
                    entries.push(DiffEntry {
                        path: join(&path, key),
                        before: None,
                        after: Some(post_value.clone()),
                    });
                }
            }
        }
        (Value::Array(pre_list), Value::Array(post_list)) => {
            let shared = pre_list.len().min(post_list.len());
            for index in 0..shared {
                walk(
                    &pre_list[index],
                    &post_list[index],
                    join(&path, &index.to_string()),
                    entries,
                );
            }
            for (index, pre_value) in pre_list.iter().enumerate().skip(shared) {
                entries.push(DiffEntry {
                    path: join(&path, &index.to_string()),
                    before: Some(pre_value.clone()),
                    after: None,
                });
            }
            for (index, post_value) in post_list.iter().enumerate().skip(shared) {
                entries.push(DiffEntry {
                    path: join(&path, &index.to_string()),
                    before: None,
                    after: Some(post_value.clone()),
                });
            }
        }
        (pre_value, post_value) => {
            if pre_value != post_value {
                entries.push(DiffEntry {
                    path,
                    before: Some(pre_value.clone()),
                    after: Some(post_value.clone()),
                });
            }
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_trees_produce_an_empty_diff() {
        let tree = json!({
            "domain": { "name": "example.com" },
            "interface": { "GigabitEthernet": [ { "name": "0/1" } ] }
        });
        assert!(structural_diff(&tree, &tree).is_empty());
    }

    #[test]
    fn changed_nested_value_is_reported_with_its_path() {
        let pre = json!({ "domain": { "name": "old.example.com" } });
        let post = json!({ "domain": { "name": "example.com" } });

        let entries = structural_diff(&pre, &post);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "domain.name");
        assert_eq!(entries[0].before, Some(json!("old.example.com")));
        assert_eq!(entries[0].after, Some(json!("example.com")));
    }

    #[test]
    fn added_and_removed_keys_are_both_reported() {
        let pre = json!({ "banner": { "motd": { "banner": "old" } }, "gone": 1 });
        let post = json!({ "banner": { "motd": { "banner": "old" } }, "fresh": 2 });

        let entries = structural_diff(&pre, &post);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|entry| entry.path == "gone"
            && entry.before == Some(json!(1))
            && entry.after.is_none()));
        assert!(entries.iter().any(|entry| entry.path == "fresh"
            && entry.before.is_none()
            && entry.after == Some(json!(2))));
    }

    #[test]
    fn appended_array_element_shows_up_as_an_addition() {
        let pre = json!({ "GigabitEthernet": [ { "name": "0/1" } ] });
        let post = json!({ "GigabitEthernet": [ { "name": "0/1" }, { "name": "0/2" } ] });

        let entries = structural_diff(&pre, &post);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "GigabitEthernet.1");
        assert!(entries[0].before.is_none());
    }

    #[test]
    fn type_change_is_a_single_leaf_entry() {
        let pre = json!({ "value": 3 });
        let post = json!({ "value": "3" });

        let entries = structural_diff(&pre, &post);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "value");
    }
}
