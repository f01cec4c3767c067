//! Optional per-entity behaviours declared under `extras`.

use tracing::debug;

use posttypes_config::{ExtrasDef, Keyed};
use posttypes_host::{Priority, DEFAULT_PRIORITY};

use crate::hooks::HookRegistry;
use crate::names::NameTable;

/// Panel holding the legacy custom-fields editor
pub const LEGACY_META_PANEL: &str = "postcustom";

/// Edit screen context the legacy panel lives in
pub const LEGACY_META_CONTEXT: &str = "normal";

pub const FEATURE_PRIORITY: Priority = DEFAULT_PRIORITY;

/// Bind the declared extras of each entity. Returns the number of hooks
/// added.
pub fn bind_features(
    extras: &[Keyed<ExtrasDef>],
    names: &NameTable,
    hooks: &mut HookRegistry,
) -> usize {
    let mut bound = 0;
    for Keyed { key, def } in extras {
        let entity = names.resolve(key).to_string();

        if let Some(text) = def.title_text.clone() {
            let target = entity.clone();
            hooks.add_title_filter(FEATURE_PRIORITY, move |title, current| {
                if current == target {
                    text.clone()
                } else {
                    title
                }
            });
            bound += 1;
        }

        if let Some(per_page) = def.pagination {
            let target = entity.clone();
            hooks.add_query_action(FEATURE_PRIORITY, move |query| {
                if !query.is_admin && query.is_main_query && query.is_archive_of(&target) {
                    query.posts_per_page = Some(per_page);
                }
            });
            bound += 1;
        }

        if def.remove_meta_box {
            let target = entity.clone();
            hooks.add_menu_action(FEATURE_PRIORITY, move |screen| {
                screen.remove_panel(LEGACY_META_PANEL, &target, LEGACY_META_CONTEXT);
            });
            bound += 1;
        }

        debug!(key = %key, entity = %entity, "bound extras");
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::ListingQuery;
    use crate::names::NameMapper;
    use posttypes_host::{InMemoryHost, RemovedPanel};

    fn extras(key: &str, def: ExtrasDef) -> Vec<Keyed<ExtrasDef>> {
        vec![Keyed::new(key, def)]
    }

    fn bound(defs: &[Keyed<ExtrasDef>]) -> (HookRegistry, usize) {
        let mut names = NameMapper::new();
        names.bind("book", "library_book").unwrap();
        let mut hooks = HookRegistry::new();
        let count = bind_features(defs, &names.freeze(), &mut hooks);
        (hooks, count)
    }

    #[test]
    fn test_nothing_bound_without_keys() {
        let (hooks, count) = bound(&extras("book", ExtrasDef::default()));
        assert_eq!(count, 0);
        assert!(hooks.is_empty());
    }

    #[test]
    fn test_title_text_only_for_its_entity() {
        let (hooks, count) = bound(&extras(
            "book",
            ExtrasDef {
                title_text: Some("Book title".into()),
                ..Default::default()
            },
        ));
        assert_eq!(count, 1);
        assert_eq!(
            hooks.apply_title_filters("Add title", "library_book"),
            "Book title"
        );
        assert_eq!(hooks.apply_title_filters("Add title", "post"), "Add title");
    }

    #[test]
    fn test_pagination_only_on_front_end_main_archive() {
        let (hooks, _) = bound(&extras(
            "book",
            ExtrasDef {
                pagination: Some(12),
                ..Default::default()
            },
        ));

        let mut archive = ListingQuery::archive("library_book");
        hooks.apply_query_actions(&mut archive);
        assert_eq!(archive.posts_per_page, Some(12));

        let mut admin = ListingQuery {
            is_admin: true,
            ..ListingQuery::archive("library_book")
        };
        hooks.apply_query_actions(&mut admin);
        assert_eq!(admin.posts_per_page, None);

        let mut secondary = ListingQuery {
            is_main_query: false,
            ..ListingQuery::archive("library_book")
        };
        hooks.apply_query_actions(&mut secondary);
        assert_eq!(secondary.posts_per_page, None);

        let mut other = ListingQuery::archive("post");
        hooks.apply_query_actions(&mut other);
        assert_eq!(other.posts_per_page, None);
    }

    #[test]
    fn test_remove_meta_box() {
        let (hooks, count) = bound(&extras(
            "book",
            ExtrasDef {
                remove_meta_box: true,
                ..Default::default()
            },
        ));
        assert_eq!(count, 1);

        let mut host = InMemoryHost::new();
        hooks.run_admin_menu(&mut host);
        assert_eq!(
            host.removed_panels(),
            &[RemovedPanel {
                panel: "postcustom".into(),
                entity: "library_book".into(),
                context: "normal".into(),
            }]
        );
    }
}
