//! Deferred host calls.
//!
//! Registration never touches the host registry while definitions are being
//! processed. Each mutation is recorded as a [`HostCall`] tagged with the
//! lifecycle event and priority it belongs to. The resulting
//! [`RegistrationPlan`] is either executed directly or handed to a host
//! scheduler.

use serde::Serialize;
use tracing::{debug, trace};

use posttypes_host::{
    EntityArgs, EntityRegistry, HostResult, LifecycleEvent, LifecycleScheduler, Priority,
};

/// Priority of register calls.
pub const REGISTER_PRIORITY: Priority = 10;

/// Priority of patches to pre-existing entities. Runs after every register
/// call of the same event, including ones made by other plugins at default
/// priority.
pub const PATCH_PRIORITY: Priority = 99;

/// A single mutation of the host registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
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

impl HostCall {
    /// Name of the entity, taxonomy or meta field the call acts on.
    pub fn target(&self) -> &str {
        match self {
            Self::RegisterEntity { name, .. }
            | Self::PatchEntity { name, .. }
            | Self::RegisterTaxonomy { name, .. } => name,
            Self::RegisterMetaField { field, .. } => field,
        }
    }

    pub fn apply<R: EntityRegistry + ?Sized>(&self, registry: &mut R) -> HostResult<()> {
        trace!(call = ?self, "applying host call");
        match self {
            Self::RegisterEntity { name, args } => registry.register_entity(name, args),
            Self::PatchEntity { name, patch } => registry.patch_entity(name, patch),
            Self::RegisterTaxonomy {
                name,
                object_types,
                args,
            } => registry.register_taxonomy(name, object_types, args),
            Self::RegisterMetaField {
                entity,
                field,
                args,
            } => registry.register_meta_field(entity, field, args),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledCall {
    pub event: LifecycleEvent,
    pub priority: Priority,
    pub call: HostCall,
}

/// Host calls in the order they were scheduled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegistrationPlan {
    calls: Vec<ScheduledCall>,
}

impl RegistrationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, event: LifecycleEvent, priority: Priority, call: HostCall) {
        trace!(%event, priority, target = call.target(), "scheduled host call");
        self.calls.push(ScheduledCall {
            event,
            priority,
            call,
        });
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Calls in scheduling order.
    pub fn calls(&self) -> &[ScheduledCall] {
        &self.calls
    }

    /// Calls in execution order: by event, then priority, then scheduling
    /// order.
    pub fn ordered(&self) -> Vec<&ScheduledCall> {
        let mut ordered: Vec<_> = self.calls.iter().collect();
        ordered.sort_by_key(|scheduled| (scheduled.event, scheduled.priority));
        ordered
    }

    /// Run every call against `registry` in execution order, stopping at the
    /// first host error. Returns the number of calls applied.
    pub fn execute<R: EntityRegistry + ?Sized>(&self, registry: &mut R) -> HostResult<usize> {
        let ordered = self.ordered();
        for scheduled in &ordered {
            scheduled.call.apply(registry)?;
        }
        debug!(calls = ordered.len(), "executed registration plan");
        Ok(ordered.len())
    }

    /// Hand every call to a host scheduler. The host decides when each
    /// event fires.
    pub fn schedule_on<S: LifecycleScheduler + ?Sized>(self, scheduler: &mut S) {
        let count = self.calls.len();
        for ScheduledCall {
            event,
            priority,
            call,
        } in self.calls
        {
            scheduler.schedule_at_priority(
                event,
                priority,
                Box::new(move |registry: &mut dyn EntityRegistry| {
                    call.apply(registry)
                }),
            );
        }
        debug!(calls = count, "handed registration plan to host scheduler");
    }
}
