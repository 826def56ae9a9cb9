//! Recursive key transforms between wire casing and local casing.

use crate::case::{to_camel_case, to_snake_case};
use serde_json::{Map, Value};

/// Marker key of the wrapper produced by [`untransformed`].
pub const UNTRANSFORMED_KEY: &str = "$untransformed";

/// Wraps a value so the key transforms leave it untouched.
///
/// The wrapper is removed by [`to_local_case`] / [`to_wire_case`]; the inner
/// value is emitted exactly as given.
pub fn untransformed(value: Value) -> Value {
    let mut wrapper = Map::with_capacity(1);
    wrapper.insert(UNTRANSFORMED_KEY.to_string(), value);
    Value::Object(wrapper)
}

/// Renames every object key to camelCase, recursing into arrays and objects.
pub fn to_local_case(value: Value) -> Value {
    transform_keys(value, &to_camel_case)
}

/// Renames every object key to snake_case, recursing into arrays and objects.
pub fn to_wire_case(value: Value) -> Value {
    transform_keys(value, &to_snake_case)
}

fn transform_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(mut map) => {
            if map.len() == 1 && map.contains_key(UNTRANSFORMED_KEY) {
                return map.remove(UNTRANSFORMED_KEY).unwrap_or(Value::Null);
            }
            map.into_iter()
                .map(|(key, inner)| (rename(&key), transform_keys(inner, rename)))
                .collect::<Map<_, _>>()
                .into()
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| transform_keys(item, rename))
                .collect(),
        ),
        other => other,
    }
}
