//! Typed definitions parsed from a [`ConfigTree`].
//!
//! Each entry of each section is parsed on its own. An entry that does not
//! have the expected shape becomes a [`DefinitionError`] in
//! [`Definitions::rejected`]; the rest of the section is unaffected.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DefinitionError, DefinitionKind};
use crate::tree::{value_kind, ConfigTree};
use crate::types::{
    AdminColumnsDef, ExtrasDef, MetaFieldDef, MetaGroup, RecordTypeDef, TaxonomyDef,
};
use crate::{ADMIN_COLUMNS, EXTRAS, POST_META, POST_TYPES, TAXONOMIES};

/// A definition together with the internal key it was declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub key: String,
    pub def: T,
}

impl<T> Keyed<T> {
    pub fn new(key: impl Into<String>, def: T) -> Self {
        Self {
            key: key.into(),
            def,
        }
    }
}

/// Every definition in a configuration tree, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    pub record_types: Vec<Keyed<RecordTypeDef>>,
    pub taxonomies: Vec<Keyed<TaxonomyDef>>,
    pub meta: Vec<Keyed<MetaGroup>>,
    pub admin_columns: Vec<Keyed<AdminColumnsDef>>,
    pub extras: Vec<Keyed<ExtrasDef>>,
    /// Entries that could not be parsed; already logged
    pub rejected: Vec<DefinitionError>,
}

impl Definitions {
    pub fn from_tree(tree: &ConfigTree) -> Self {
        let mut defs = Self::default();

        defs.record_types = defs.parse_section(tree, POST_TYPES, DefinitionKind::RecordType);
        defs.taxonomies = defs.parse_section(tree, TAXONOMIES, DefinitionKind::Taxonomy);
        defs.meta = defs.parse_meta(tree);
        defs.admin_columns =
            defs.parse_section(tree, ADMIN_COLUMNS, DefinitionKind::AdminColumns);
        defs.extras = defs.parse_section(tree, EXTRAS, DefinitionKind::Extras);

        debug!(
            record_types = defs.record_types.len(),
            taxonomies = defs.taxonomies.len(),
            meta_groups = defs.meta.len(),
            admin_columns = defs.admin_columns.len(),
            extras = defs.extras.len(),
            rejected = defs.rejected.len(),
            "parsed configuration definitions"
        );
        defs
    }

    pub fn is_empty(&self) -> bool {
        self.record_types.is_empty()
            && self.taxonomies.is_empty()
            && self.meta.is_empty()
            && self.admin_columns.is_empty()
            && self.extras.is_empty()
    }

    fn reject(&mut self, error: DefinitionError) {
        warn!(kind = %error.kind(), key = error.key(), "{error}");
        self.rejected.push(error);
    }

    fn section_entries<'t>(
        &mut self,
        tree: &'t ConfigTree,
        section: &str,
        kind: DefinitionKind,
    ) -> Vec<(&'t String, &'t Value)> {
        match tree.section(section) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(entries)) => entries.iter().collect(),
            Some(other) => {
                self.reject(DefinitionError::Malformed {
                    kind,
                    key: section.to_string(),
                    message: format!("expected a mapping of keys, found {}", value_kind(other)),
                });
                Vec::new()
            }
        }
    }

    fn parse_section<T: DeserializeOwned>(
        &mut self,
        tree: &ConfigTree,
        section: &str,
        kind: DefinitionKind,
    ) -> Vec<Keyed<T>> {
        let mut parsed = Vec::new();
        for (key, value) in self.section_entries(tree, section, kind) {
            match parse_entry(kind, key, value) {
                Ok(def) => parsed.push(Keyed::new(key.clone(), def)),
                Err(error) => self.reject(error),
            }
        }
        parsed
    }

    /// `post_meta` entries come in two shapes: a mapping of field name to
    /// field definition, or a single field under a `meta` key that carries
    /// its own `name`.
    fn parse_meta(&mut self, tree: &ConfigTree) -> Vec<Keyed<MetaGroup>> {
        let kind = DefinitionKind::MetaField;
        let mut groups = Vec::new();

        for (key, value) in self.section_entries(tree, POST_META, kind) {
            let Value::Object(entry) = value else {
                self.reject(malformed(kind, key, value));
                continue;
            };

            let mut group = MetaGroup::default();
            if let Some(single) = entry.get("meta").filter(|v| v.is_object()) {
                let name = single
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|n| !n.trim().is_empty());
                match name {
                    Some(name) => match parse_entry::<MetaFieldDef>(kind, key, single) {
                        Ok(def) => group.fields.push(Keyed::new(name, def)),
                        Err(error) => self.reject(error),
                    },
                    None => self.reject(DefinitionError::MissingName {
                        kind,
                        key: key.clone(),
                    }),
                }
            } else {
                for (field, def) in entry {
                    if !def.is_object() {
                        debug!(key = %key, field = %field, "ignoring non-mapping meta entry");
                        continue;
                    }
                    let field_key = format!("{key}.{field}");
                    match parse_entry::<MetaFieldDef>(kind, &field_key, def) {
                        Ok(def) => group.fields.push(Keyed::new(field.clone(), def)),
                        Err(error) => self.reject(error),
                    }
                }
            }

            if !group.fields.is_empty() {
                groups.push(Keyed::new(key.clone(), group));
            }
        }
        groups
    }
}

fn parse_entry<T: DeserializeOwned>(
    kind: DefinitionKind,
    key: &str,
    value: &Value,
) -> Result<T, DefinitionError> {
    if !value.is_object() {
        return Err(malformed(kind, key, value));
    }
    serde_json::from_value(value.clone()).map_err(|e| DefinitionError::Malformed {
        kind,
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn malformed(kind: DefinitionKind, key: &str, value: &Value) -> DefinitionError {
    DefinitionError::Malformed {
        kind,
        key: key.to_string(),
        message: format!("expected a mapping, found {}", value_kind(value)),
    }
}
