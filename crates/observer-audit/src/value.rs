//! Conversions from loosely-typed hook arguments.
//!
//! Hook arguments arrive as `serde_json::Value`s. Everything that ends up in
//! the `data` field goes through [`stringify_for_audit`] so the formatter only
//! ever sees flat strings.

use serde_json::{Map, Value};

/// Render a value for the `data` field.
///
/// - `null` renders empty
/// - booleans render `true` / `false`
/// - numbers and strings render as-is
/// - arrays and objects render as compact JSON with object keys sorted at
///   every depth, so equal values always produce equal text
pub fn stringify_for_audit(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => canonicalize(value).to_string(),
    }
}

/// `(old)->(new)`, the change summary used by both option handlers.
pub fn describe_change(old_value: &Value, new_value: &Value) -> String {
    format!(
        "({})->({})",
        stringify_for_audit(old_value),
        stringify_for_audit(new_value)
    )
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        other => other.clone(),
    }
}

/// Read an object id from a hook argument.
///
/// Accepts a number, a numeric string, or an object carrying `ID`, `id` or
/// `user_id` (the host passes whole user objects to some hooks).
pub fn as_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => ["ID", "id", "user_id"]
            .iter()
            .find_map(|key| map.get(*key).and_then(as_id)),
        _ => None,
    }
}

/// Read a scalar argument as text. Non-scalars are stringified.
pub fn as_text(value: &Value) -> String {
    stringify_for_audit(value)
}

/// Truthiness of a flag argument: `null`, `false`, `0`, `""` and `"0"` are
/// false, everything else is true.
pub fn as_flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(stringify_for_audit(&Value::Null), "");
        assert_eq!(stringify_for_audit(&json!(true)), "true");
        assert_eq!(stringify_for_audit(&json!(42)), "42");
        assert_eq!(stringify_for_audit(&json!(1.5)), "1.5");
        assert_eq!(stringify_for_audit(&json!("blogname")), "blogname");
    }

    #[test]
    fn test_objects_have_sorted_keys() {
        let value = json!({"zeta": 1, "alpha": {"b": 2, "a": [3, {"y": 1, "x": 0}]}});
        assert_eq!(
            stringify_for_audit(&value),
            r#"{"alpha":{"a":[3,{"x":0,"y":1}],"b":2},"zeta":1}"#
        );
    }

    #[test]
    fn test_structured_values_contain_no_raw_newlines() {
        let old = json!({"body": "line one\nline two", "list": ["a\r\nb"]});
        let new = json!(["x\n", {"k": "\n\n"}]);
        let data = describe_change(&old, &new);
        assert!(!data.contains('\n'));
        assert!(!data.contains('\r'));
        assert!(data.starts_with('('));
        assert!(data.contains(")->("));
    }

    #[test]
    fn test_describe_change_scalars() {
        assert_eq!(describe_change(&json!("old"), &json!("new")), "(old)->(new)");
        assert_eq!(describe_change(&Value::Null, &json!(7)), "()->(7)");
    }

    #[test]
    fn test_as_id() {
        assert_eq!(as_id(&json!(12)), Some(12));
        assert_eq!(as_id(&json!(" 12 ")), Some(12));
        assert_eq!(as_id(&json!({"ID": 5, "user_login": "ana"})), Some(5));
        assert_eq!(as_id(&json!({"id": "6"})), Some(6));
        assert_eq!(as_id(&json!(-1)), None);
        assert_eq!(as_id(&Value::Null), None);
    }

    #[test]
    fn test_as_flag() {
        assert!(as_flag(&json!(true)));
        assert!(as_flag(&json!(1)));
        assert!(as_flag(&json!("yes")));
        assert!(!as_flag(&json!("0")));
        assert!(!as_flag(&json!(0)));
        assert!(!as_flag(&Value::Null));
    }
}
