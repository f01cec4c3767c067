//! posttypes configuration management
//!
//! Loads the declarative document that describes record types, taxonomies,
//! meta fields, admin columns and extra features, and turns it into typed
//! definitions for the registrar.
//!
//! # Features
//!
//! - **Explicit or discovered sources**: a pre-built tree, a document path, or a
//!   search over three default locations (first existing file wins)
//! - **JSON and YAML**: format picked from the file extension, key order preserved
//! - **Recursive merge**: [`ConfigTree::merge`] layers an override tree on top
//!   of the loaded one; mappings merge, leaves and arrays are replaced
//! - **Typed definitions**: [`ConfigTree::definitions`] validates each entry on
//!   its own, so one malformed entry never hides its siblings
//!
//! # Quick Start
//!
//! ```no_run
//! use posttypes_config::ConfigResolver;
//!
//! let resolver = ConfigResolver::from_env()?;
//! let tree = resolver.resolve(None)?;
//! let definitions = tree.definitions();
//! println!("{} record types", definitions.record_types.len());
//! # Ok::<(), posttypes_config::ConfigError>(())
//! ```
//!
//! # Document Shape
//!
//! ```json
//! {
//!   "post_types": { "book": { "singular": "Book" } },
//!   "taxonomies": { "genre": { "name": "genre", "post_types": ["book"] } },
//!   "post_meta": { "book": { "isbn": { "type": "string" } } },
//!   "admin_columns": { "book": { "show_featured_image": true, "columns": [{ "name": "isbn" }] } },
//!   "extras": { "book": { "title_text": "Book title", "pagination": 12 } }
//! }
//! ```

/// Typed, keyed definitions parsed from a tree
pub mod definitions;
/// Default document locations
pub mod discovery;
/// Error types and handling
pub mod error;
/// Recursive value merge
pub mod merge;
/// Reading documents from disk
pub mod provider;
/// Source selection
pub mod resolver;
/// The configuration tree
pub mod tree;
/// Definition shapes for each top-level section
pub mod types;

pub use definitions::{Definitions, Keyed};
pub use discovery::{DiscoveryPaths, DEFAULT_CONFIG_FILE};
pub use error::{ConfigError, ConfigResult, DefinitionError, DefinitionKind};
pub use merge::merge_recursive;
pub use provider::{load_document, DocumentFormat};
pub use resolver::{ConfigResolver, ConfigSource};
pub use tree::ConfigTree;
pub use types::{
    AdminColumnsDef, ColumnDef, ExtrasDef, MetaFieldDef, MetaGroup, RecordTypeDef, TaxonomyDef,
};

/// Top-level section holding record type definitions
pub const POST_TYPES: &str = "post_types";
/// Top-level section holding taxonomy definitions
pub const TAXONOMIES: &str = "taxonomies";
/// Top-level section holding meta field groups
pub const POST_META: &str = "post_meta";
/// Top-level section holding admin column layouts
pub const ADMIN_COLUMNS: &str = "admin_columns";
/// Top-level section holding optional feature toggles
pub const EXTRAS: &str = "extras";
