pub mod counters;
pub mod description;
pub mod duplex;
pub mod presence;
pub mod status;

use serde_json::Value;

use crate::state::attribute::{NATIVE_ROOT, OPENCONFIG_INTERFACES_ROOT};
use crate::state::lookup::lookup;

/// Full interface names from the native tree, which groups interfaces by type
/// ("GigabitEthernet": [{ "name": "0/1" }, ...]).
pub(crate) fn configured_native_interfaces(state: &Value) -> Vec<String> {
    let mut names = Vec::new();

    let by_kind = match lookup(state, &[NATIVE_ROOT, "interface"]).and_then(|value| value.as_object())
    {
        Some(by_kind) => by_kind,
        None => return names,
    };

    for (kind, entries) in by_kind {
        let entries = match entries.as_array() {
            Some(entries) => entries,
            None => continue,
        };
        for entry in entries {
            if let Some(number) = entry.get("name") {
                // Interface numbers may deserialize as numbers or strings.
                let number = match number {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                names.push(format!("{}{}", kind, number));
            }
        }
    }

    names
}

/// The interface list of the OpenConfig interfaces tree.
pub(crate) fn openconfig_interfaces(state: &Value) -> &[Value] {
    lookup(state, &[OPENCONFIG_INTERFACES_ROOT, "interface"])
        .and_then(|value| value.as_array())
        .map(|list| list.as_slice())
        .unwrap_or(&[])
}

pub(crate) fn interface_name(entry: &Value) -> &str {
    entry.get("name").and_then(|value| value.as_str()).unwrap_or("")
}
