//! Replacement of non-finite floats so a [`Value`] tree can be written as
//! strict JSON.
//!
//! Search results from the upstream provider may carry infinite or NaN
//! distances and ranking scores. [`sanitize`] returns a copy of the tree in
//! which every such float is [`Value::Null`]; nothing else changes.

use crate::value::{Map, Value};

/// Return a copy of `value` with every infinite or NaN float replaced by
/// [`Value::Null`].
///
/// Object keys keep their order, arrays keep their length and order, and
/// integers, strings, booleans and nulls are returned unchanged. The input is
/// not modified.
///
/// # Example
///
/// ```
/// use fuelprices_lib::{decode, sanitize, Value};
///
/// let raw = decode::from_str(r#"{"price": 1.5, "distance": Infinity}"#).unwrap();
/// let clean = sanitize(&raw);
///
/// assert_eq!(clean.get("price"), Some(&Value::Float(1.5)));
/// assert_eq!(clean.get("distance"), Some(&Value::Null));
/// ```
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Float(f) if !f.is_finite() => Value::Null,
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(Map::from_unique_entries(
            map.iter()
                .map(|(key, value)| (key.to_string(), sanitize(value)))
                .collect(),
        )),
        other => other.clone(),
    }
}

/// Count the floats [`sanitize`] would replace.
pub fn count_non_finite(value: &Value) -> usize {
    match value {
        Value::Float(f) if !f.is_finite() => 1,
        Value::Array(items) => items.iter().map(count_non_finite).sum(),
        Value::Object(map) => map.values().map(count_non_finite).sum(),
        _ => 0,
    }
}
