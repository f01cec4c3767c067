//! Traits a host platform implements to receive registrations

use serde_json::{Map, Value};

use crate::error::HostResult;
use crate::event::{LifecycleEvent, Priority};

/// Argument set handed to the host for one entity, keyed by argument name.
pub type EntityArgs = Map<String, Value>;

/// Identifier of a single content item (a row in an admin listing).
pub type ItemId = u64;

/// The host's entity registry.
///
/// Mutating calls return `HostResult` so a host can surface validation
/// failures; posttypes propagates them untouched.
pub trait EntityRegistry {
    /// Whether an entity is already registered under `name`.
    fn entity_exists(&self, name: &str) -> bool;

    /// Register a new record type.
    fn register_entity(&mut self, name: &str, args: &EntityArgs) -> HostResult<()>;

    /// Overwrite individual fields of an existing record type. Fields not in
    /// `patch` must be left as they are.
    fn patch_entity(&mut self, name: &str, patch: &EntityArgs) -> HostResult<()>;

    /// Register a taxonomy attached to the given record types.
    fn register_taxonomy(
        &mut self,
        name: &str,
        object_types: &[String],
        args: &EntityArgs,
    ) -> HostResult<()>;

    /// Register a meta field on a record type.
    fn register_meta_field(&mut self, entity: &str, field: &str, args: &EntityArgs)
        -> HostResult<()>;
}

/// Deferred unit of work handed to a [`LifecycleScheduler`].
pub type ScheduledCallback = Box<dyn FnOnce(&mut dyn EntityRegistry) -> HostResult<()>>;

/// A host whose bootstrap is callback driven.
pub trait LifecycleScheduler {
    /// Run `callback` when `event` fires, ordered by `priority` among the
    /// event's callbacks.
    fn schedule_at_priority(
        &mut self,
        event: LifecycleEvent,
        priority: Priority,
        callback: ScheduledCallback,
    );
}

/// Read access to stored content, used when rendering admin cells.
pub trait ContentSource {
    /// Thumbnail markup for an item, if it has a featured image.
    fn render_thumbnail(&self, item: ItemId, width: u32, height: u32) -> Option<String>;

    /// Stored value of a meta field; `Value::Null` when unset.
    fn meta_value(&self, item: ItemId, field: &str) -> Value;
}

/// Mutations of the host's admin screens.
pub trait AdminScreen {
    /// Remove a metadata panel from the edit screen of `entity`.
    fn remove_panel(&mut self, panel: &str, entity: &str, context: &str);
}
