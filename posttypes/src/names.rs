//! Internal key → registered name bindings.
//!
//! A [`NameMapper`] is filled while record types are processed and then
//! frozen into a read-only [`NameTable`] that taxonomies, meta fields, admin
//! columns and extras resolve through. Keys with no binding resolve to
//! themselves, so configuration may mix internal keys and literal names.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::NameConflict;

#[derive(Debug, Clone, Default)]
pub struct NameMapper {
    bindings: IndexMap<String, String>,
}

impl NameMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `name`. Re-binding to the same name is a no-op;
    /// re-binding to a different name fails and leaves the first binding.
    pub fn bind(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<(), NameConflict> {
        let key = key.into();
        let name = name.into();
        match self.bindings.get(&key) {
            Some(existing) if *existing == name => Ok(()),
            Some(existing) => Err(NameConflict {
                key,
                existing: existing.clone(),
                requested: name,
            }),
            None => {
                trace!(key = %key, name = %name, "bound internal key");
                self.bindings.insert(key, name);
                Ok(())
            }
        }
    }

    /// Bound name for `key`, or `key` itself.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.bindings.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Stop accepting bindings.
    pub fn freeze(self) -> NameTable {
        NameTable {
            bindings: self.bindings,
        }
    }
}

/// Read-only bindings, produced by [`NameMapper::freeze`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    bindings: IndexMap<String, String>,
}

impl NameTable {
    /// Bound name for `key`, or `key` itself.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.bindings.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Resolve a list that may mix internal keys and literal names.
    pub fn resolve_all(&self, keys: &[String]) -> Vec<String> {
        keys.iter().map(|k| self.resolve(k).to_string()).collect()
    }

    /// Bound name for `key`, without the literal fallback.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
