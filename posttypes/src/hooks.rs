//! Host extension points driven after registration.
//!
//! The host calls into [`HookRegistry`] at its own extension points: while
//! building an edit screen title, before running a listing query, when the
//! admin menu is assembled, and while rendering admin listings. Callbacks of
//! the same kind run by ascending priority, then in the order they were
//! added.
//!
//! It also keeps the sanitizer chosen for every registered meta field, so a
//! host without its own implementation can clean values before storing them.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use posttypes_host::{AdminScreen, ContentSource, ItemId, Priority};

use serde_json::Value;

use crate::columns::{AdminColumns, ColumnList};
use crate::sanitize::Sanitizer;

/// Rewrites the title placeholder of an edit screen for an entity.
pub type TitleFilter = Box<dyn Fn(String, &str) -> String + Send + Sync>;

/// Adjusts a listing query before it runs.
pub type QueryAction = Box<dyn Fn(&mut ListingQuery) + Send + Sync>;

/// Mutates admin screens once the admin menu is built.
pub type MenuAction = Box<dyn Fn(&mut dyn AdminScreen) + Send + Sync>;

/// The parts of a pending content query that feature hooks inspect or set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub is_admin: bool,
    pub is_main_query: bool,
    /// Entity whose archive is being listed, if any
    pub archive_of: Option<String>,
    pub posts_per_page: Option<i64>,
}

impl ListingQuery {
    /// Main front-end query for the archive of `entity`.
    pub fn archive(entity: impl Into<String>) -> Self {
        Self {
            is_admin: false,
            is_main_query: true,
            archive_of: Some(entity.into()),
            posts_per_page: None,
        }
    }

    pub fn is_archive_of(&self, entity: &str) -> bool {
        self.archive_of.as_deref() == Some(entity)
    }
}

struct Prioritized<T> {
    priority: Priority,
    seq: usize,
    callback: T,
}

fn insert_prioritized<T>(list: &mut Vec<Prioritized<T>>, priority: Priority, seq: usize, callback: T) {
    let pos = list.partition_point(|entry| (entry.priority, entry.seq) <= (priority, seq));
    list.insert(
        pos,
        Prioritized {
            priority,
            seq,
            callback,
        },
    );
}

/// Callbacks and layouts bound to the host's extension points.
///
/// Built once by the orchestrator and then only read, so the host can share it
/// across requests.
#[derive(Default)]
pub struct HookRegistry {
    title_filters: Vec<Prioritized<TitleFilter>>,
    query_actions: Vec<Prioritized<QueryAction>>,
    menu_actions: Vec<Prioritized<MenuAction>>,
    columns: IndexMap<String, Arc<AdminColumns>>,
    meta_sanitizers: IndexMap<String, Sanitizer>,
    next_seq: usize,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn seq(&mut self) -> usize {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Add a filter for the edit screen title placeholder. Each filter gets
    /// the current title and the entity being edited and returns the new
    /// title.
    pub fn add_title_filter<F>(&mut self, priority: Priority, filter: F)
    where
        F: Fn(String, &str) -> String + Send + Sync + 'static,
    {
        let seq = self.seq();
        let filter: TitleFilter = Box::new(filter);
        insert_prioritized(&mut self.title_filters, priority, seq, filter);
    }

    /// Add an action run on every listing query before it executes.
    pub fn add_query_action<F>(&mut self, priority: Priority, action: F)
    where
        F: Fn(&mut ListingQuery) + Send + Sync + 'static,
    {
        let seq = self.seq();
        let action: QueryAction = Box::new(action);
        insert_prioritized(&mut self.query_actions, priority, seq, action);
    }

    /// Add an action run once the admin menu is assembled.
    pub fn add_menu_action<F>(&mut self, priority: Priority, action: F)
    where
        F: Fn(&mut dyn AdminScreen) + Send + Sync + 'static,
    {
        let seq = self.seq();
        let action: MenuAction = Box::new(action);
        insert_prioritized(&mut self.menu_actions, priority, seq, action);
    }

    /// Attach a column layout to its entity. A later layout for the same
    /// entity replaces the earlier one.
    pub fn add_admin_columns(&mut self, columns: AdminColumns) {
        let entity = columns.entity().to_string();
        if self
            .columns
            .insert(entity.clone(), Arc::new(columns))
            .is_some()
        {
            debug!(entity = %entity, "replaced admin column layout");
        }
    }

    /// Remember the sanitizer of the meta field registered as `meta_key`.
    pub fn add_meta_sanitizer(&mut self, meta_key: impl Into<String>, sanitizer: Sanitizer) {
        self.meta_sanitizers.insert(meta_key.into(), sanitizer);
    }

    /// Sanitizer of a registered meta field
    pub fn meta_sanitizer(&self, meta_key: &str) -> Option<&Sanitizer> {
        self.meta_sanitizers.get(meta_key)
    }

    /// Clean `value` before it is stored under `meta_key`. Keys that were not
    /// registered here pass through unchanged.
    pub fn sanitize_meta(&self, meta_key: &str, value: &Value) -> Value {
        match self.meta_sanitizers.get(meta_key) {
            Some(sanitizer) => sanitizer.apply(value),
            None => {
                trace!(meta_key, "no sanitizer registered");
                value.clone()
            }
        }
    }

    /// Title placeholder for the edit screen of `entity`.
    pub fn apply_title_filters(&self, title: impl Into<String>, entity: &str) -> String {
        self.title_filters
            .iter()
            .fold(title.into(), |title, entry| (entry.callback)(title, entity))
    }

    /// Run every query action on `query`.
    pub fn apply_query_actions(&self, query: &mut ListingQuery) {
        for entry in &self.query_actions {
            (entry.callback)(query);
        }
        trace!(?query, "applied query actions");
    }

    /// Run every menu action against the host's admin screen.
    pub fn run_admin_menu(&self, screen: &mut dyn AdminScreen) {
        for entry in &self.menu_actions {
            (entry.callback)(&mut *screen);
        }
    }

    pub fn admin_columns(&self, entity: &str) -> Option<&AdminColumns> {
        self.columns.get(entity).map(Arc::as_ref)
    }

    /// The host column list of `entity` after its layout is applied.
    pub fn filter_columns(&self, entity: &str, columns: &ColumnList) -> ColumnList {
        match self.columns.get(entity) {
            Some(layout) => layout.augment(columns),
            None => columns.clone(),
        }
    }

    /// Cell content of a column added for `entity`.
    pub fn render_column<C: ContentSource + ?Sized>(
        &self,
        entity: &str,
        column: &str,
        item: ItemId,
        content: &C,
    ) -> Option<String> {
        self.columns
            .get(entity)?
            .render_cell(column, item, content)
    }

    /// Markup for the admin page head: the column width styles of every
    /// layout.
    pub fn admin_head(&self) -> String {
        self.columns
            .values()
            .map(|layout| layout.inline_styles())
            .collect()
    }

    pub fn title_filter_count(&self) -> usize {
        self.title_filters.len()
    }

    pub fn query_action_count(&self) -> usize {
        self.query_actions.len()
    }

    pub fn menu_action_count(&self) -> usize {
        self.menu_actions.len()
    }

    pub fn column_layout_count(&self) -> usize {
        self.columns.len()
    }

    pub fn meta_sanitizer_count(&self) -> usize {
        self.meta_sanitizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.title_filters.is_empty()
            && self.query_actions.is_empty()
            && self.menu_actions.is_empty()
            && self.columns.is_empty()
            && self.meta_sanitizers.is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("title_filters", &self.title_filters.len())
            .field("query_actions", &self.query_actions.len())
            .field("menu_actions", &self.menu_actions.len())
            .field("columns", &self.columns.keys().collect::<Vec<_>>())
            .field("meta_sanitizers", &self.meta_sanitizers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{CellSource, ColumnSpec};
    use posttypes_host::InMemoryHost;

    #[test]
    fn test_title_filters_run_by_priority_then_insertion() {
        let mut hooks = HookRegistry::new();
        hooks.add_title_filter(20, |title, _| format!("{title}c"));
        hooks.add_title_filter(10, |title, _| format!("{title}a"));
        hooks.add_title_filter(10, |title, _| format!("{title}b"));

        assert_eq!(hooks.apply_title_filters("", "book"), "abc");
        assert_eq!(hooks.title_filter_count(), 3);
    }

    #[test]
    fn test_query_actions_mutate_query() {
        let mut hooks = HookRegistry::new();
        hooks.add_query_action(10, |query| {
            if query.is_archive_of("book") {
                query.posts_per_page = Some(12);
            }
        });

        let mut archive = ListingQuery::archive("book");
        hooks.apply_query_actions(&mut archive);
        assert_eq!(archive.posts_per_page, Some(12));

        let mut other = ListingQuery::archive("event");
        hooks.apply_query_actions(&mut other);
        assert_eq!(other.posts_per_page, None);
    }

    #[test]
    fn test_menu_actions_reach_screen() {
        let mut hooks = HookRegistry::new();
        hooks.add_menu_action(10, |screen| screen.remove_panel("postcustom", "book", "normal"));

        let mut host = InMemoryHost::new();
        hooks.run_admin_menu(&mut host);
        assert_eq!(host.removed_panels().len(), 1);
    }

    #[test]
    fn test_column_hooks_dispatch_by_entity() {
        let mut hooks = HookRegistry::new();
        hooks.add_admin_columns(
            AdminColumns::new("book")
                .with_column(
                    ColumnSpec::new("isbn", "ISBN", CellSource::MetaLookup("book_isbn".into()))
                        .with_width("120px"),
                ),
        );

        let input: ColumnList = [("cb", "Select"), ("title", "Title"), ("date", "Date")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let book = hooks.filter_columns("book", &input);
        assert_eq!(
            book.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["cb", "title", "isbn", "date"]
        );
        assert_eq!(hooks.filter_columns("event", &input), input);

        let mut host = InMemoryHost::new();
        host.set_meta_value(3, "book_isbn", serde_json::json!("978-0"));
        assert_eq!(
            hooks.render_column("book", "isbn", 3, &host).as_deref(),
            Some("978-0")
        );
        assert_eq!(hooks.render_column("event", "isbn", 3, &host), None);
        assert_eq!(
            hooks.admin_head(),
            "<style>.column-isbn { width: 120px; }</style>"
        );
    }

    #[test]
    fn test_sanitize_meta_by_registered_key() {
        let mut hooks = HookRegistry::new();
        hooks.add_meta_sanitizer("book_pages", Sanitizer::AbsoluteInteger);
        hooks.add_meta_sanitizer("book_isbn", Sanitizer::Named("sanitize_isbn".into()));

        assert_eq!(
            hooks.sanitize_meta("book_pages", &serde_json::json!("-320 pages")),
            serde_json::json!(320)
        );
        assert_eq!(
            hooks.sanitize_meta("book_isbn", &serde_json::json!(" 978-0 ")),
            serde_json::json!(" 978-0 ")
        );
        assert_eq!(
            hooks.sanitize_meta("book_notes", &serde_json::json!("<b>raw</b>")),
            serde_json::json!("<b>raw</b>")
        );
        assert_eq!(hooks.meta_sanitizer_count(), 2);
        assert!(!hooks.is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let hooks = HookRegistry::new();
        assert!(hooks.is_empty());
        assert_eq!(hooks.admin_head(), "");
        assert_eq!(hooks.apply_title_filters("Add title", "book"), "Add title");
    }
}
