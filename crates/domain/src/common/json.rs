//! JSON document helpers.

use serde_json::Value;

/// Deep-merge `patch` into `target`.
///
/// Objects merge key by key, recursively. Any other value in `patch`
/// replaces the value in `target`. Keys absent from `patch` keep their
/// current value.
pub fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}
