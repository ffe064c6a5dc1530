//! Recursive pruning of empty JSON values.
//!
//! Exported entity documents nest child records several levels deep, and most
//! optional fields are unset for any given record. [`clean_value`] strips the
//! resulting nulls and empty containers before serialization so that consumers
//! never see `"field": null` or `"aliases": []`.

use serde_json::Value;

/// Remove empty items from a JSON tree.
///
/// Returns `None` when the value itself reduces to nothing:
///
/// - `null` is removed
/// - arrays keep only non-empty elements; an array with none left is removed
/// - objects keep only entries whose values survive cleaning; an object with
///   no entries left is removed, propagating emptiness upward
/// - scalars (strings, numbers, booleans) pass through unchanged
///
/// The transform preserves element order and object key order, and is
/// idempotent: cleaning a cleaned tree is a no-op.
pub fn clean_value(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                if let Some(cleaned) = clean_value(item) {
                    out.insert(key, cleaned);
                }
            }
            if out.is_empty() {
                None
            } else {
                Some(Value::Object(out))
            }
        }
        Value::Array(items) => {
            let out: Vec<Value> = items.into_iter().filter_map(clean_value).collect();
            if out.is_empty() {
                None
            } else {
                Some(Value::Array(out))
            }
        }
        other => Some(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(clean_value(json!("x")), Some(json!("x")));
        assert_eq!(clean_value(json!(42)), Some(json!(42)));
        assert_eq!(clean_value(json!(false)), Some(json!(false)));
        assert_eq!(clean_value(json!(null)), None);
    }

    #[test]
    fn test_nulls_and_empty_containers_removed() {
        let input = json!({
            "a": null,
            "b": { "c": null },
            "d": [1, null, 2]
        });
        assert_eq!(clean_value(input), Some(json!({ "d": [1, 2] })));
    }

    #[test]
    fn test_emptiness_propagates_upward() {
        let input = json!({
            "outer": { "inner": { "leaf": null } },
            "list": [{}, [], null]
        });
        assert_eq!(clean_value(input), None);
    }

    #[test]
    fn test_idempotent() {
        let input = json!({
            "id": "ofac-acme-corp",
            "gap": null,
            "aliases": [{ "name": "ACME", "note": null }],
            "births": []
        });
        let once = clean_value(input).unwrap();
        let twice = clean_value(once.clone()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            json!({
                "id": "ofac-acme-corp",
                "aliases": [{ "name": "ACME" }]
            })
        );
    }

    #[test]
    fn test_key_order_preserved() {
        let input = json!({ "z": 1, "drop": null, "a": 2 });
        let cleaned = clean_value(input).unwrap();
        let keys: Vec<&String> = cleaned.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a"]);
    }
}
