//! The configuration tree

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::definitions::Definitions;
use crate::error::{ConfigError, ConfigResult};
use crate::merge::merge_maps;

/// A normalized configuration document: a mapping from top-level section
/// names to their contents, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree(Map<String, Value>);

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a parsed document. `null` is treated as empty;
    /// anything other than a mapping is rejected.
    pub fn from_value(value: Value, origin: &str) -> ConfigResult<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConfigError::InvalidRoot {
                origin: origin.to_string(),
                found: value_kind(&other),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Contents of a top-level section.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Recursively merge `overlay` into this tree. See [`crate::merge_recursive`].
    pub fn merge(&mut self, overlay: ConfigTree) {
        merge_maps(&mut self.0, overlay.0);
    }

    /// Owned form of [`ConfigTree::merge`].
    pub fn merged(mut self, overlay: ConfigTree) -> Self {
        self.merge(overlay);
        self
    }

    /// Parse every section into typed definitions.
    pub fn definitions(&self) -> Definitions {
        Definitions::from_tree(self)
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
