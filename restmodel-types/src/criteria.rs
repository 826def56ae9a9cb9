//! Criteria matching over plain JSON objects.

use crate::Dao;
use serde_json::Value;

/// Returns true when every key in `criteria` is present in `object` with an
/// equal value. An empty criteria object matches everything.
pub fn object_meets_criteria(object: &Dao, criteria: &Dao) -> bool {
    criteria
        .iter()
        .all(|(key, expected)| object.get(key).is_some_and(|actual| actual == expected))
}

/// JavaScript-style truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy,
/// everything else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
