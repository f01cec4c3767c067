//! Host platform boundary for posttypes
//!
//! The registration orchestrator never talks to a content platform directly.
//! Everything it needs from one is expressed by the traits in this crate:
//!
//! - [`EntityRegistry`]: existence checks plus register/patch calls for record
//!   types, taxonomies and meta fields
//! - [`LifecycleScheduler`]: the deferred-execution primitive hosts with a
//!   callback-driven bootstrap expose
//! - [`ContentSource`]: thumbnails and stored meta values for admin cells
//! - [`AdminScreen`]: admin-page mutations such as removing a panel
//!
//! [`memory`] provides an in-memory implementation of every trait. It records
//! each call it receives, which makes it suitable for dry runs and tests.

pub mod error;
pub mod event;
pub mod memory;
pub mod registry;

pub use error::{HostError, HostResult};
pub use event::{LifecycleEvent, Priority, DEFAULT_PRIORITY};
pub use memory::{InMemoryHost, ManualScheduler, RecordedCall, RemovedPanel, TaxonomyRecord};
pub use registry::{
    AdminScreen, ContentSource, EntityArgs, EntityRegistry, ItemId, LifecycleScheduler,
    ScheduledCallback,
};
