//! Dotted-key conversion
//!
//! `flatten_dotted` turns nested objects into `a.b.c` keys, leaving arrays
//! intact. `nest_dotted` goes the other way and also nests keys inside
//! objects held in arrays.

use serde_json::{Map, Value};

/// Flattens an object into dotted keys. Non-objects flatten to nothing.
pub fn flatten_dotted(value: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    if let Value::Object(map) = value {
        for (key, child) in map {
            flatten_into(key.clone(), child, &mut out);
        }
    }
    out
}

fn flatten_into(prefix: String, value: &Value, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(format!("{}.{}", prefix, key), child, out);
            }
        }
        other => {
            out.insert(prefix, other.clone());
        }
    }
}

/// Converts dotted keys into hierarchical objects.
///
/// A key that collides with a scalar already placed on its path is kept
/// whole at the top level.
pub fn nest_dotted(flat: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in flat {
        let value = nest_value(value);
        if let Some(value) = insert_path(&mut out, &key, value) {
            if key.contains('.') {
                out.insert(key, value);
            } else {
                tracing::debug!(key = %key, "dropping scalar shadowed by nested keys");
            }
        }
    }
    out
}

fn nest_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(nest_dotted(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(nest_value).collect()),
        other => other,
    }
}

/// Returns the value back on collision
fn insert_path(target: &mut Map<String, Value>, key: &str, value: Value) -> Option<Value> {
    match key.split_once('.') {
        None => {
            if target.contains_key(key) {
                return Some(value);
            }
            target.insert(key.to_string(), value);
            None
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match child {
                Value::Object(map) => insert_path(map, rest, value),
                _ => Some(value),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_keeps_arrays() {
        let flat = flatten_dotted(&json!({
            "school": {"name": "A", "address": {"city": "B"}},
            "programs": [{"code": {"x": 1}}],
            "empty": {}
        }));
        assert_eq!(
            Value::Object(flat),
            json!({
                "school.name": "A",
                "school.address.city": "B",
                "programs": [{"code": {"x": 1}}],
                "empty": {}
            })
        );
    }

    #[test]
    fn test_flatten_non_object() {
        assert!(flatten_dotted(&json!(false)).is_empty());
        assert!(flatten_dotted(&Value::Null).is_empty());
    }

    #[test]
    fn test_nest_dotted() {
        let flat = match json!({
            "school.name": "A",
            "school.city": "B",
            "latest.programs": [{"credential.level": 3}],
            "id": 1
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        assert_eq!(
            Value::Object(nest_dotted(flat)),
            json!({
                "school": {"name": "A", "city": "B"},
                "latest": {"programs": [{"credential": {"level": 3}}]},
                "id": 1
            })
        );
    }

    #[test]
    fn test_nest_collision_keeps_dotted_key() {
        let flat = match json!({"a": 1, "a.b": 2}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        assert_eq!(Value::Object(nest_dotted(flat)), json!({"a": 1, "a.b": 2}));
    }
}
