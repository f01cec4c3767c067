//! Create-or-modify registration of record types, taxonomies and meta fields.
//!
//! The registrar reads the host registry once per record type to decide
//! between the two strategies and otherwise only writes to a
//! [`RegistrationPlan`]:
//!
//! - **create**: the entity is not registered yet. Full defaults and labels
//!   are generated, the declared arguments are laid over them, and a single
//!   register call is scheduled at [`REGISTER_PRIORITY`].
//! - **modify**: the host already knows the name. Only the declared fields are
//!   patched, at [`PATCH_PRIORITY`] so the patch lands after the original
//!   registration.
//!
//! Taxonomies and meta fields are always created. Definitions that cannot be
//! registered are logged and collected; they never stop their siblings.

use serde_json::{json, Value};
use tracing::{debug, warn};

use posttypes_config::{
    DefinitionError, DefinitionKind, Keyed, MetaGroup, RecordTypeDef, TaxonomyDef,
};
use posttypes_host::{EntityArgs, EntityRegistry, LifecycleEvent};

use crate::args::{merge_args, LABELS};
use crate::labels::{record_type_labels, taxonomy_labels};
use crate::names::{NameMapper, NameTable};
use crate::naming::{format_entity_name, humanize, pluralize, sanitize_key, sanitize_slug};
use crate::plan::{HostCall, RegistrationPlan, PATCH_PRIORITY, REGISTER_PRIORITY};
use crate::sanitize::Sanitizer;

/// Default menu position of created record types
pub const MENU_POSITION: i64 = 21;

/// Editor features enabled on created record types
pub const DEFAULT_SUPPORTS: [&str; 5] = ["editor", "excerpt", "page-attributes", "title", "thumbnail"];

/// Value type of meta fields that do not declare one
pub const DEFAULT_META_TYPE: &str = "string";

/// Turns typed definitions into a [`RegistrationPlan`].
///
/// The registry is borrowed read-only; nothing reaches the host until the plan
/// is executed or scheduled.
pub struct EntityRegistrar<'r, R: EntityRegistry + ?Sized> {
    registry: &'r R,
    plan: RegistrationPlan,
    meta_sanitizers: Vec<(String, Sanitizer)>,
    skipped: Vec<DefinitionError>,
}

impl<'r, R: EntityRegistry + ?Sized> EntityRegistrar<'r, R> {
    /// Start an empty plan against `registry`
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            plan: RegistrationPlan::new(),
            meta_sanitizers: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Plan every record type and bind its key in `names`.
    pub fn register_record_types(
        &mut self,
        defs: &[Keyed<RecordTypeDef>],
        names: &mut NameMapper,
    ) {
        for Keyed { key, def } in defs {
            let name = match def.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format_entity_name(key),
            };
            if name.is_empty() {
                self.skip(DefinitionError::MissingName {
                    kind: DefinitionKind::RecordType,
                    key: key.clone(),
                });
                continue;
            }

            let prefix = def.prefix.as_deref().map(sanitize_key).unwrap_or_default();
            let registered = format!("{prefix}{name}");
            if let Err(conflict) = names.bind(key.as_str(), registered.as_str()) {
                self.skip(DefinitionError::Conflict {
                    kind: DefinitionKind::RecordType,
                    key: key.clone(),
                    message: conflict.to_string(),
                });
                continue;
            }

            if self.registry.entity_exists(&registered) {
                debug!(key = %key, name = %registered, "record type exists, patching");
                self.modify_record_type(key, &registered, def);
            } else {
                debug!(key = %key, name = %registered, "creating record type");
                self.create_record_type(key, &name, &registered, def);
            }
        }
    }

    fn create_record_type(&mut self, key: &str, name: &str, registered: &str, def: &RecordTypeDef) {
        let (singular, plural) = display_names(key, def.singular.as_deref(), def.plural.as_deref());
        let slug = sanitize_slug(def.slug.as_deref().unwrap_or(name));
        let archive = match def.archive.as_deref() {
            Some(archive) => sanitize_slug(archive),
            None => sanitize_slug(&pluralize(name)),
        };

        let mut defaults = EntityArgs::new();
        defaults.insert(
            LABELS.into(),
            Value::Object(record_type_labels(&singular, &plural)),
        );
        for flag in [
            "hierarchical",
            "public",
            "show_ui",
            "show_in_menu",
            "show_in_nav_menus",
            "show_in_rest",
            "publicly_queryable",
        ] {
            defaults.insert(flag.into(), Value::Bool(true));
        }
        defaults.insert("exclude_from_search".into(), Value::Bool(false));
        defaults.insert("has_archive".into(), Value::String(archive));
        defaults.insert("query_var".into(), Value::Bool(true));
        defaults.insert("can_export".into(), Value::Bool(true));
        defaults.insert("menu_position".into(), json!(MENU_POSITION));
        defaults.insert("rewrite".into(), json!({ "slug": slug, "with_front": false }));
        defaults.insert("supports".into(), json!(DEFAULT_SUPPORTS));
        defaults.insert(
            "capability_type".into(),
            Value::String(def.capability_type.clone().unwrap_or_else(|| "post".into())),
        );
        defaults.insert("map_meta_cap".into(), Value::Bool(true));
        if let Some(capabilities) = &def.capabilities {
            defaults.insert("capabilities".into(), Value::Object(capabilities.clone()));
        }

        self.plan.schedule(
            LifecycleEvent::Init,
            REGISTER_PRIORITY,
            HostCall::RegisterEntity {
                name: registered.to_string(),
                args: merge_args(defaults, &def.args),
            },
        );
    }

    fn modify_record_type(&mut self, key: &str, registered: &str, def: &RecordTypeDef) {
        let mut patch = EntityArgs::new();
        if def.singular.is_some() || def.plural.is_some() {
            let (singular, plural) =
                display_names(key, def.singular.as_deref(), def.plural.as_deref());
            patch.insert("label".into(), Value::String(plural.clone()));
            patch.insert(
                LABELS.into(),
                Value::Object(record_type_labels(&singular, &plural)),
            );
        }

        self.plan.schedule(
            LifecycleEvent::Init,
            PATCH_PRIORITY,
            HostCall::PatchEntity {
                name: registered.to_string(),
                patch: merge_args(patch, &def.args),
            },
        );
    }

    /// Plan every taxonomy. Owning record types resolve through `names`.
    pub fn register_taxonomies(&mut self, defs: &[Keyed<TaxonomyDef>], names: &NameTable) {
        for Keyed { key, def } in defs {
            let name = def.name.as_deref().map(sanitize_key).unwrap_or_default();
            if name.is_empty() {
                self.skip(DefinitionError::MissingName {
                    kind: DefinitionKind::Taxonomy,
                    key: key.clone(),
                });
                continue;
            }

            let (singular, plural) =
                display_names(key, def.singular.as_deref(), def.plural.as_deref());
            let slug = sanitize_slug(def.slug.as_deref().unwrap_or(key));
            let object_types = names.resolve_all(&def.post_types);

            let mut defaults = EntityArgs::new();
            defaults.insert(
                LABELS.into(),
                Value::Object(taxonomy_labels(&singular, &plural)),
            );
            for flag in [
                "hierarchical",
                "public",
                "show_ui",
                "show_admin_column",
                "show_in_nav_menus",
            ] {
                defaults.insert(flag.into(), Value::Bool(true));
            }
            defaults.insert("show_tagcloud".into(), Value::Bool(false));
            defaults.insert("show_in_rest".into(), Value::Bool(true));
            defaults.insert("rewrite".into(), json!({ "slug": slug, "with_front": false }));

            debug!(key = %key, name = %name, ?object_types, "creating taxonomy");
            self.plan.schedule(
                LifecycleEvent::Init,
                REGISTER_PRIORITY,
                HostCall::RegisterTaxonomy {
                    name,
                    object_types,
                    args: merge_args(defaults, &def.args),
                },
            );
        }
    }

    /// Plan every meta field, once for `init` and once for `rest_api_init`.
    pub fn register_meta_fields(&mut self, groups: &[Keyed<MetaGroup>], names: &NameTable) {
        for Keyed { key, def } in groups {
            let entity = names.resolve(key);
            for field in &def.fields {
                let value_type = field
                    .def
                    .value_type
                    .as_deref()
                    .unwrap_or(DEFAULT_META_TYPE);
                let sanitizer =
                    Sanitizer::resolve(field.def.sanitize_callback.as_deref(), Some(value_type));

                let mut args = EntityArgs::new();
                args.insert("show_in_rest".into(), Value::Bool(true));
                args.insert("single".into(), Value::Bool(true));
                args.insert("type".into(), Value::String(value_type.to_string()));
                args.insert(
                    "description".into(),
                    Value::String(field.def.description.clone().unwrap_or_default()),
                );
                if let Some(default) = &field.def.default {
                    args.insert("default".into(), default.clone());
                }
                args.insert(
                    "sanitize_callback".into(),
                    Value::String(sanitizer.callback_name().to_string()),
                );

                let registered = format!("{entity}_{}", field.key);
                self.meta_sanitizers.push((registered.clone(), sanitizer));
                for event in [LifecycleEvent::Init, LifecycleEvent::RestApiInit] {
                    self.plan.schedule(
                        event,
                        REGISTER_PRIORITY,
                        HostCall::RegisterMetaField {
                            entity: entity.to_string(),
                            field: registered.clone(),
                            args: args.clone(),
                        },
                    );
                }
            }
            debug!(key = %key, entity, fields = def.fields.len(), "planned meta fields");
        }
    }

    fn skip(&mut self, error: DefinitionError) {
        warn!(kind = %error.kind(), key = error.key(), "{error}");
        self.skipped.push(error);
    }

    /// Definitions skipped so far.
    pub fn skipped(&self) -> &[DefinitionError] {
        &self.skipped
    }

    /// Registered meta key and sanitizer of every planned meta field.
    pub fn meta_sanitizers(&self) -> &[(String, Sanitizer)] {
        &self.meta_sanitizers
    }

    /// Hand over the plan and the skipped definitions.
    pub fn finish(self) -> (RegistrationPlan, Vec<DefinitionError>) {
        (self.plan, self.skipped)
    }
}

/// Singular and plural display names, defaulting from the internal key.
fn display_names(key: &str, singular: Option<&str>, plural: Option<&str>) -> (String, String) {
    let singular = singular
        .map(str::to_string)
        .unwrap_or_else(|| humanize(key));
    let plural = plural
        .map(str::to_string)
        .unwrap_or_else(|| pluralize(&singular));
    (singular, plural)
}
