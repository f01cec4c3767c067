//! Definition shapes for each top-level configuration section.
//!
//! Every field is optional at this level; defaults that depend on the
//! internal key (labels, slugs, registered names) are computed by the
//! registrar, not here.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::definitions::Keyed;

/// A record type (`post_types.<key>`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordTypeDef {
    /// Registered name; derived from the key when absent
    pub name: Option<String>,
    /// Prepended to the registered name on the create path
    pub prefix: Option<String>,
    pub singular: Option<String>,
    pub plural: Option<String>,
    pub slug: Option<String>,
    /// Archive slug
    pub archive: Option<String>,
    pub capability_type: Option<String>,
    pub capabilities: Option<Map<String, Value>>,
    /// Raw registration arguments, shallow-merged over the defaults
    pub args: Map<String, Value>,
}

/// A taxonomy (`taxonomies.<key>`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaxonomyDef {
    /// Required
    pub name: Option<String>,
    pub slug: Option<String>,
    pub singular: Option<String>,
    pub plural: Option<String>,
    /// Internal keys or literal registered names of the owning record types
    pub post_types: Vec<String>,
    pub args: Map<String, Value>,
}

/// A single meta field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetaFieldDef {
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    /// Host sanitizer name; resolved from the value type when absent
    pub sanitize_callback: Option<String>,
}

/// The meta fields declared for one record type (`post_meta.<key>`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaGroup {
    pub fields: Vec<Keyed<MetaFieldDef>>,
}

/// One declared admin column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnDef {
    pub name: Option<String>,
    pub label: Option<String>,
    /// CSS width; bare numbers are read as pixels
    #[serde(deserialize_with = "css_length")]
    pub width: Option<String>,
    /// Meta field to display; defaults to `<entity>_<name>`
    pub meta_key: Option<String>,
    /// Name of a callback registered on the manager
    pub callback: Option<String>,
}

/// Admin table layout for one record type (`admin_columns.<key>`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdminColumnsDef {
    pub show_featured_image: bool,
    pub columns: Vec<ColumnDef>,
}

/// Optional behaviours for one record type (`extras.<key>`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtrasDef {
    /// Placeholder shown in the title field of the edit screen
    pub title_text: Option<String>,
    /// Items per page on the front-end archive
    #[serde(deserialize_with = "page_count")]
    pub pagination: Option<i64>,
    /// Hide the legacy custom-fields panel
    pub remove_meta_box: bool,
}

fn css_length<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Length {
        Text(String),
        Pixels(f64),
    }

    Ok(match Option::<Length>::deserialize(deserializer)? {
        Some(Length::Text(text)) => Some(text),
        Some(Length::Pixels(px)) => Some(format!("{px}px")),
        None => None,
    })
}

/// Accepts `12`, `12.0` and `"12"`. A string that is not a number leaves the
/// count unset instead of rejecting the whole entry.
fn page_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Whole(i64),
        Fractional(f64),
        Text(String),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Whole(n)) => Some(n),
        Some(Count::Fractional(n)) => Some(n.trunc() as i64),
        Some(Count::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_type_defaults_are_empty() {
        let def: RecordTypeDef = serde_json::from_value(json!({})).unwrap();
        assert_eq!(def, RecordTypeDef::default());
    }

    #[test]
    fn pagination_accepts_numeric_strings() {
        let def: ExtrasDef = serde_json::from_value(json!({
            "title_text": "Book title",
            "pagination": " 12 ",
            "remove_meta_box": true
        }))
        .unwrap();
        assert_eq!(def.pagination, Some(12));
        assert_eq!(def.title_text.as_deref(), Some("Book title"));
        assert!(def.remove_meta_box);

        let def: ExtrasDef = serde_json::from_value(json!({ "pagination": 8.0 })).unwrap();
        assert_eq!(def.pagination, Some(8));

        let def: ExtrasDef =
            serde_json::from_value(json!({ "pagination": "lots", "title_text": "Kept" })).unwrap();
        assert_eq!(def.pagination, None);
        assert_eq!(def.title_text.as_deref(), Some("Kept"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let def: RecordTypeDef =
            serde_json::from_value(json!({ "singular": "Book", "show_featured_image": true }))
                .unwrap();
        assert_eq!(def.singular.as_deref(), Some("Book"));
    }

    #[test]
    fn column_width_accepts_numbers() {
        let col: ColumnDef =
            serde_json::from_value(json!({ "name": "isbn", "width": 120 })).unwrap();
        assert_eq!(col.width.as_deref(), Some("120px"));

        let col: ColumnDef =
            serde_json::from_value(json!({ "name": "isbn", "width": "10%" })).unwrap();
        assert_eq!(col.width.as_deref(), Some("10%"));

        let col: ColumnDef = serde_json::from_value(json!({ "name": "isbn" })).unwrap();
        assert_eq!(col.width, None);
    }

    #[test]
    fn meta_null_default_is_absent() {
        let def: MetaFieldDef =
            serde_json::from_value(json!({ "type": "integer", "default": null })).unwrap();
        assert_eq!(def.value_type.as_deref(), Some("integer"));
        assert_eq!(def.default, None);
    }
}
