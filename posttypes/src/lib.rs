//! Declarative content-entity registration
//!
//! `posttypes` turns a configuration document into record types, taxonomies,
//! meta fields and admin column layouts inside a host content platform. The
//! host is reached only through the traits in `posttypes-host`.
//!
//! # Architecture
//!
//! - **Name table**: internal keys are bound to registered names while record
//!   types are processed, then frozen; every later section resolves through it
//! - **Create or modify**: a record type the host already knows is patched
//!   instead of registered, so only the declared fields change
//! - **Plans, not side effects**: registration produces a [`RegistrationPlan`]
//!   that is executed directly or handed to a host scheduler
//! - **Hooks**: admin columns and extras live in a [`HookRegistry`] the host
//!   drives from its own extension points

pub mod args;
pub mod columns;
pub mod error;
pub mod features;
pub mod hooks;
pub mod labels;
pub mod manager;
pub mod names;
pub mod naming;
pub mod plan;
pub mod registrar;
pub mod sanitize;

pub use columns::{AdminColumns, CellSource, ColumnCallbacks, ColumnList, ColumnSpec};
pub use error::{Error, NameConflict, Result};
pub use features::bind_features;
pub use hooks::{HookRegistry, ListingQuery};
pub use manager::{Bootstrap, PostTypeManager};
pub use names::{NameMapper, NameTable};
pub use plan::{HostCall, RegistrationPlan, ScheduledCall, PATCH_PRIORITY, REGISTER_PRIORITY};
pub use registrar::EntityRegistrar;
pub use sanitize::Sanitizer;
