//! Container shape classification.
//!
//! Mirrors the four-way distinction the ini serializer formats by: empty
//! containers, canonical zero-based sequences, sparse integer-keyed maps, and
//! string-keyed maps.

use serde_json::Value;

/// Shape of a container value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No entries at all.
    Empty,
    /// Keys are exactly the integers `0..n-1` in order.
    Sequential,
    /// Integer keys, but sparse or not zero-based.
    Numeric,
    /// At least one key is a non-integer string.
    Associative,
}

/// Classify any value by its container shape.
///
/// Pure and total: arrays are Sequential by construction, objects are
/// classified by key set, and scalars have no entries so they count as Empty.
pub fn classify(value: &Value) -> Shape {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Shape::Empty
            } else {
                Shape::Sequential
            }
        }
        Value::Object(map) => {
            if map.is_empty() {
                return Shape::Empty;
            }
            let mut keys = Vec::with_capacity(map.len());
            for key in map.keys() {
                match integer_key(key) {
                    Some(index) => keys.push(index),
                    None => return Shape::Associative,
                }
            }
            let sequential = keys
                .iter()
                .enumerate()
                .all(|(position, index)| position as u64 == *index);
            if sequential {
                Shape::Sequential
            } else {
                Shape::Numeric
            }
        }
        _ => Shape::Empty,
    }
}

/// Whether a value is a sequence or mapping rather than a scalar.
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Parse a key as a canonical decimal index; "00" and "+1" stay strings.
fn integer_key(key: &str) -> Option<u64> {
    let index: u64 = key.parse().ok()?;
    if index.to_string() == key {
        Some(index)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_containers_classify_as_empty() {
        assert_eq!(classify(&json!([])), Shape::Empty);
        assert_eq!(classify(&json!({})), Shape::Empty);
    }

    #[test]
    fn scalars_classify_as_empty() {
        assert_eq!(classify(&json!(null)), Shape::Empty);
        assert_eq!(classify(&json!("text")), Shape::Empty);
        assert_eq!(classify(&json!(42)), Shape::Empty);
    }

    #[test]
    fn arrays_are_sequential() {
        assert_eq!(classify(&json!(["a", "b"])), Shape::Sequential);
    }

    #[test]
    fn zero_based_integer_keys_are_sequential() {
        assert_eq!(classify(&json!({"0": "a", "1": "b"})), Shape::Sequential);
    }

    #[test]
    fn sparse_integer_keys_are_numeric() {
        assert_eq!(classify(&json!({"0": "a", "2": "b"})), Shape::Numeric);
        assert_eq!(classify(&json!({"1": "a", "2": "b"})), Shape::Numeric);
    }

    #[test]
    fn string_keys_are_associative() {
        assert_eq!(classify(&json!({"k": "a"})), Shape::Associative);
        assert_eq!(classify(&json!({"0": "a", "k": "b"})), Shape::Associative);
    }

    #[test]
    fn non_canonical_integer_keys_stay_strings() {
        assert_eq!(classify(&json!({"00": "a"})), Shape::Associative);
        assert_eq!(classify(&json!({"+1": "a"})), Shape::Associative);
    }
}
