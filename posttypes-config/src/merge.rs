//! Recursive merge for configuration trees
//!
//! Used when layering one configuration document over another. Per-entity
//! argument merging is shallow and lives with the registrar; keep the two
//! apart.

use serde_json::{Map, Value};

/// Merge `overlay` into `base`.
///
/// When both sides are mappings, keys are merged one by one, recursing into
/// nested mappings and appending keys only `overlay` has. In every other case
/// (scalars, arrays, or a type mismatch) `overlay` replaces `base` wholesale.
/// Arrays are never concatenated or merged by index.
pub fn merge_recursive(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_maps(base_map, overlay_map);
        }
        (base, overlay) => *base = overlay,
    }
}

/// Mapping-level form of [`merge_recursive`].
pub fn merge_maps(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge_recursive(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}
