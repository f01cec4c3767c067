//! Per-entity argument merging.
//!
//! Declared arguments are laid over the generated defaults with a shallow
//! override: a declared key replaces the default value outright, arrays and
//! nested mappings included. `labels` is the one exception and is merged
//! key by key, so overriding a single label keeps the rest of the generated
//! set. Configuration trees use the recursive merge in `posttypes-config`
//! instead.

use posttypes_host::EntityArgs;

/// Argument key holding the label set
pub const LABELS: &str = "labels";

/// Shallow override of `defaults` by `declared`, merging `labels` key by key.
pub fn merge_args(mut defaults: EntityArgs, declared: &EntityArgs) -> EntityArgs {
    for (key, value) in declared {
        if key == LABELS {
            if let (Some(serde_json::Value::Object(existing)), serde_json::Value::Object(labels)) =
                (defaults.get_mut(LABELS), value)
            {
                for (label, text) in labels {
                    existing.insert(label.clone(), text.clone());
                }
                continue;
            }
        }
        defaults.insert(key.clone(), value.clone());
    }
    defaults
}
