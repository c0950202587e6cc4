//! Deep-merge helper for configuration trees.

use serde_json::Value;

/// Merge overlay values into the base with later-wins precedence.
///
/// Mapping pairs merge per key recursively; any other pairing — sequence or
/// scalar on either side — is replaced outright by the overlay.
pub(crate) fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}
