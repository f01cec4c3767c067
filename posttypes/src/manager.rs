//! The registration orchestrator.

use tracing::{debug, info};

use posttypes_config::{ConfigResolver, ConfigSource, ConfigTree, DefinitionError};
use posttypes_host::{EntityRegistry, ItemId, LifecycleScheduler};

use crate::columns::{AdminColumns, ColumnCallbacks};
use crate::error::Result;
use crate::features::bind_features;
use crate::hooks::HookRegistry;
use crate::names::{NameMapper, NameTable};
use crate::plan::RegistrationPlan;
use crate::registrar::EntityRegistrar;

/// Owns a configuration tree and turns it into a [`Bootstrap`].
///
/// ```
/// use posttypes::PostTypeManager;
/// use posttypes_config::ConfigTree;
/// use posttypes_host::InMemoryHost;
/// use serde_json::json;
///
/// let tree = ConfigTree::from_value(
///     json!({ "post_types": { "book": { "singular": "Book" } } }),
///     "inline",
/// )?;
/// let mut host = InMemoryHost::new();
/// let bootstrap = PostTypeManager::new(tree).boot(&mut host)?;
///
/// assert_eq!(bootstrap.registered_name("book"), "book");
/// assert!(host.entity("book").is_some());
/// # Ok::<(), posttypes::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct PostTypeManager {
    config: ConfigTree,
    callbacks: ColumnCallbacks,
}

impl PostTypeManager {
    pub fn new(config: ConfigTree) -> Self {
        Self {
            config,
            callbacks: ColumnCallbacks::new(),
        }
    }

    /// Load configuration from `source`, or discover it in the directories
    /// taken from the environment.
    pub fn load(source: Option<ConfigSource>) -> Result<Self> {
        let resolver = ConfigResolver::from_env()?;
        Self::with_resolver(&resolver, source)
    }

    pub fn with_resolver(resolver: &ConfigResolver, source: Option<ConfigSource>) -> Result<Self> {
        Ok(Self::new(resolver.resolve(source)?))
    }

    /// Layer `overlay` over the current configuration.
    pub fn merge_config(&mut self, overlay: ConfigTree) {
        self.config.merge(overlay);
    }

    pub fn set_config(&mut self, config: ConfigTree) {
        self.config = config;
    }

    pub fn config(&self) -> &ConfigTree {
        &self.config
    }

    /// Make `callback` available to admin columns declaring
    /// `"callback": "<name>"`.
    pub fn register_column_callback<F>(&mut self, name: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(ItemId) -> String + Send + Sync + 'static,
    {
        self.callbacks.register(name, callback);
        self
    }

    /// Build everything the configuration declares. `registry` is only read,
    /// to choose between creating and patching each record type.
    ///
    /// Record types go first so that every later section resolves its keys
    /// against the complete name table.
    pub fn init<R: EntityRegistry + ?Sized>(self, registry: &R) -> Bootstrap {
        let definitions = self.config.definitions();
        let mut skipped = definitions.rejected;

        let mut names = NameMapper::new();
        let mut registrar = EntityRegistrar::new(registry);
        registrar.register_record_types(&definitions.record_types, &mut names);
        let names = names.freeze();
        debug!(bindings = names.len(), "name table frozen");

        registrar.register_taxonomies(&definitions.taxonomies, &names);
        registrar.register_meta_fields(&definitions.meta, &names);

        let mut hooks = HookRegistry::new();
        for (meta_key, sanitizer) in registrar.meta_sanitizers() {
            hooks.add_meta_sanitizer(meta_key.clone(), sanitizer.clone());
        }
        let (plan, registrar_skipped) = registrar.finish();
        skipped.extend(registrar_skipped);

        for layout in &definitions.admin_columns {
            hooks.add_admin_columns(AdminColumns::from_def(
                &layout.key,
                &layout.def,
                &names,
                &self.callbacks,
            ));
        }
        let features = bind_features(&definitions.extras, &names, &mut hooks);

        info!(
            record_types = names.len(),
            host_calls = plan.len(),
            column_layouts = hooks.column_layout_count(),
            features,
            skipped = skipped.len(),
            "post type configuration initialized"
        );

        Bootstrap {
            names,
            plan,
            hooks,
            skipped,
        }
    }

    /// [`init`](Self::init) followed by [`Bootstrap::run`].
    pub fn boot<R: EntityRegistry + ?Sized>(self, registry: &mut R) -> Result<Bootstrap> {
        let bootstrap = self.init(&*registry);
        bootstrap.run(registry)?;
        Ok(bootstrap)
    }
}

/// Result of one initialization pass.
#[derive(Debug)]
pub struct Bootstrap {
    names: NameTable,
    plan: RegistrationPlan,
    hooks: HookRegistry,
    skipped: Vec<DefinitionError>,
}

impl Bootstrap {
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Registered name of a record type key, or the key itself.
    pub fn registered_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.names.resolve(key)
    }

    pub fn plan(&self) -> &RegistrationPlan {
        &self.plan
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Definitions that were not registered, in the order they were found.
    pub fn skipped(&self) -> &[DefinitionError] {
        &self.skipped
    }

    /// Apply the plan to `registry` in execution order.
    pub fn run<R: EntityRegistry + ?Sized>(&self, registry: &mut R) -> Result<usize> {
        Ok(self.plan.execute(registry)?)
    }

    /// Hand the plan to a host scheduler instead of running it. The plan is
    /// empty afterwards.
    pub fn schedule_on<S: LifecycleScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        std::mem::take(&mut self.plan).schedule_on(scheduler);
    }

    pub fn into_hooks(self) -> HookRegistry {
        self.hooks
    }
}
