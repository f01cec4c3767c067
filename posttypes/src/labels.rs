//! Label sets handed to the host with each registration.

use posttypes_host::EntityArgs;
use serde_json::Value;

fn label_set(entries: Vec<(&str, String)>) -> EntityArgs {
    entries
        .into_iter()
        .map(|(key, text)| (key.to_string(), Value::String(text)))
        .collect()
}

/// The 13 labels of a record type.
pub fn record_type_labels(singular: &str, plural: &str) -> EntityArgs {
    label_set(vec![
        ("name", plural.to_string()),
        ("singular_name", singular.to_string()),
        ("add_new", format!("Add New {singular}")),
        ("add_new_item", format!("Add New {singular}")),
        ("edit_item", format!("Edit {singular}")),
        ("new_item", format!("New {singular}")),
        ("all_items", format!("All {plural}")),
        ("view_item", format!("View {singular}")),
        ("search_items", format!("Search {plural}")),
        ("not_found", format!("No {plural} found")),
        ("not_found_in_trash", format!("No {plural} found in Trash")),
        ("parent_item_colon", String::new()),
        ("menu_name", plural.to_string()),
    ])
}

/// The 15 labels of a taxonomy. Sentences embedding the plural use it
/// lower-cased.
pub fn taxonomy_labels(singular: &str, plural: &str) -> EntityArgs {
    let lower = plural.to_lowercase();
    label_set(vec![
        ("name", plural.to_string()),
        ("singular_name", singular.to_string()),
        ("search_items", format!("Search {singular}")),
        ("popular_items", format!("Popular {plural}")),
        ("all_items", format!("All {plural}")),
        ("parent_item", format!("Parent {singular}")),
        ("parent_item_colon", format!("Parent {singular}:")),
        ("edit_item", format!("Edit {singular}")),
        ("update_item", format!("Update {singular}")),
        ("add_new_item", format!("Add New {singular}")),
        ("new_item_name", format!("New {singular}")),
        (
            "separate_items_with_commas",
            format!("Separate {lower} with commas"),
        ),
        ("add_or_remove_items", format!("Add or remove {lower}")),
        (
            "choose_from_most_used",
            format!("Choose from the most used {lower}"),
        ),
        ("menu_name", plural.to_string()),
    ])
}
