//! In-memory host
//!
//! `InMemoryHost` keeps registered entities, taxonomies and meta fields in
//! ordered maps and records every call it receives. `ManualScheduler` collects
//! scheduled callbacks and runs them when an event is fired explicitly.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{HostError, HostResult};
use crate::event::{LifecycleEvent, Priority};
use crate::registry::{
    AdminScreen, ContentSource, EntityArgs, EntityRegistry, ItemId, LifecycleScheduler,
    ScheduledCallback,
};

/// A registry call as received by [`InMemoryHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    RegisterEntity {
        name: String,
        args: EntityArgs,
    },
    PatchEntity {
        name: String,
        patch: EntityArgs,
    },
    RegisterTaxonomy {
        name: String,
        object_types: Vec<String>,
        args: EntityArgs,
    },
    RegisterMetaField {
        entity: String,
        field: String,
        args: EntityArgs,
    },
}

/// A panel removed through [`AdminScreen::remove_panel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedPanel {
    pub panel: String,
    pub entity: String,
    pub context: String,
}

/// A registered taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyRecord {
    pub object_types: Vec<String>,
    pub args: EntityArgs,
}

#[derive(Debug, Default)]
pub struct InMemoryHost {
    entities: IndexMap<String, EntityArgs>,
    taxonomies: IndexMap<String, TaxonomyRecord>,
    meta_fields: IndexMap<(String, String), EntityArgs>,
    thumbnails: HashMap<ItemId, String>,
    meta_values: HashMap<(ItemId, String), Value>,
    removed_panels: Vec<RemovedPanel>,
    calls: Vec<RecordedCall>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entity that was registered by someone else. Not recorded as a call.
    pub fn with_entity(mut self, name: impl Into<String>, args: EntityArgs) -> Self {
        self.entities.insert(name.into(), args);
        self
    }

    /// Give an item a featured image.
    pub fn set_thumbnail(&mut self, item: ItemId, markup: impl Into<String>) {
        self.thumbnails.insert(item, markup.into());
    }

    /// Store a meta value for an item.
    pub fn set_meta_value(&mut self, item: ItemId, field: impl Into<String>, value: Value) {
        self.meta_values.insert((item, field.into()), value);
    }

    pub fn entity(&self, name: &str) -> Option<&EntityArgs> {
        self.entities.get(name)
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn taxonomy(&self, name: &str) -> Option<&TaxonomyRecord> {
        self.taxonomies.get(name)
    }

    pub fn meta_field(&self, entity: &str, field: &str) -> Option<&EntityArgs> {
        self.meta_fields
            .get(&(entity.to_string(), field.to_string()))
    }

    pub fn removed_panels(&self) -> &[RemovedPanel] {
        &self.removed_panels
    }

    /// Every registry call received, in arrival order.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn register_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::RegisterEntity { .. }))
            .count()
    }

    pub fn patch_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::PatchEntity { .. }))
            .count()
    }
}

impl EntityRegistry for InMemoryHost {
    fn entity_exists(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    fn register_entity(&mut self, name: &str, args: &EntityArgs) -> HostResult<()> {
        debug!(name, "registering entity");
        self.calls.push(RecordedCall::RegisterEntity {
            name: name.to_string(),
            args: args.clone(),
        });
        self.entities.insert(name.to_string(), args.clone());
        Ok(())
    }

    fn patch_entity(&mut self, name: &str, patch: &EntityArgs) -> HostResult<()> {
        self.calls.push(RecordedCall::PatchEntity {
            name: name.to_string(),
            patch: patch.clone(),
        });
        let existing = self
            .entities
            .get_mut(name)
            .ok_or_else(|| HostError::EntityNotFound {
                name: name.to_string(),
            })?;
        for (field, value) in patch {
            existing.insert(field.clone(), value.clone());
        }
        debug!(name, fields = patch.len(), "patched entity");
        Ok(())
    }

    fn register_taxonomy(
        &mut self,
        name: &str,
        object_types: &[String],
        args: &EntityArgs,
    ) -> HostResult<()> {
        debug!(name, ?object_types, "registering taxonomy");
        self.calls.push(RecordedCall::RegisterTaxonomy {
            name: name.to_string(),
            object_types: object_types.to_vec(),
            args: args.clone(),
        });
        self.taxonomies.insert(
            name.to_string(),
            TaxonomyRecord {
                object_types: object_types.to_vec(),
                args: args.clone(),
            },
        );
        Ok(())
    }

    fn register_meta_field(
        &mut self,
        entity: &str,
        field: &str,
        args: &EntityArgs,
    ) -> HostResult<()> {
        trace!(entity, field, "registering meta field");
        self.calls.push(RecordedCall::RegisterMetaField {
            entity: entity.to_string(),
            field: field.to_string(),
            args: args.clone(),
        });
        self.meta_fields
            .insert((entity.to_string(), field.to_string()), args.clone());
        Ok(())
    }
}

impl ContentSource for InMemoryHost {
    fn render_thumbnail(&self, item: ItemId, width: u32, height: u32) -> Option<String> {
        trace!(item, width, height, "thumbnail lookup");
        self.thumbnails.get(&item).cloned()
    }

    fn meta_value(&self, item: ItemId, field: &str) -> Value {
        self.meta_values
            .get(&(item, field.to_string()))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

impl AdminScreen for InMemoryHost {
    fn remove_panel(&mut self, panel: &str, entity: &str, context: &str) {
        self.removed_panels.push(RemovedPanel {
            panel: panel.to_string(),
            entity: entity.to_string(),
            context: context.to_string(),
        });
    }
}

struct Pending {
    event: LifecycleEvent,
    priority: Priority,
    seq: usize,
    callback: ScheduledCallback,
}

/// Collects scheduled callbacks until their event is fired.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Vec<Pending>,
    next_seq: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks still waiting for their event.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Callbacks waiting on `event`.
    pub fn pending_for(&self, event: LifecycleEvent) -> usize {
        self.pending.iter().filter(|p| p.event == event).count()
    }

    /// Run every callback attached to `event`, lowest priority first and in
    /// scheduling order within a priority. Stops at the first host error.
    pub fn fire(
        &mut self,
        event: LifecycleEvent,
        registry: &mut dyn EntityRegistry,
    ) -> HostResult<usize> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.event == event);
        self.pending = rest;
        due.sort_by_key(|p| (p.priority, p.seq));

        debug!(%event, callbacks = due.len(), "firing lifecycle event");
        let count = due.len();
        for pending in due {
            (pending.callback)(&mut *registry)?;
        }
        Ok(count)
    }
}

impl LifecycleScheduler for ManualScheduler {
    fn schedule_at_priority(
        &mut self,
        event: LifecycleEvent,
        priority: Priority,
        callback: ScheduledCallback,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            event,
            priority,
            seq,
            callback,
        });
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending.len())
            .finish()
    }
}
