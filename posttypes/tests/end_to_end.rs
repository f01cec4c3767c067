//! Full passes from a configuration document to host state.

use std::fs;

use posttypes::{ColumnList, PostTypeManager, PATCH_PRIORITY};
use posttypes_config::{ConfigResolver, ConfigSource, ConfigTree, DiscoveryPaths};
use posttypes_host::{InMemoryHost, LifecycleEvent, ManualScheduler, RecordedCall};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

fn book_config() -> Value {
    json!({
        "post_types": {
            "book": { "singular": "Book" }
        },
        "taxonomies": {
            "genre": { "name": "genre", "post_types": ["book", "post"] }
        },
        "post_meta": {
            "book": {
                "author": { "type": "string", "description": "Who wrote it" },
                "pages": { "type": "integer" }
            }
        },
        "admin_columns": {
            "book": { "columns": [{ "name": "author" }] }
        },
        "extras": {
            "book": { "title_text": "Book title", "pagination": 12 }
        }
    })
}

fn host_columns() -> ColumnList {
    [("cb", "<input type=\"checkbox\" />"), ("title", "Title"), ("date", "Date")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_book_example() {
    let tree = ConfigTree::from_value(book_config(), "inline").unwrap();
    let mut host = InMemoryHost::new();
    let bootstrap = PostTypeManager::new(tree).boot(&mut host).unwrap();

    assert!(bootstrap.skipped().is_empty());
    assert_eq!(bootstrap.registered_name("book"), "book");

    let book = host.entity("book").unwrap();
    assert_eq!(book["labels"]["name"], json!("Books"));
    assert_eq!(book["labels"]["singular_name"], json!("Book"));
    assert_eq!(host.register_count(), 1);
    assert_eq!(host.patch_count(), 0);

    let genre = host.taxonomy("genre").unwrap();
    assert_eq!(genre.object_types, vec!["book", "post"]);

    let author = host.meta_field("book", "book_author").unwrap();
    assert_eq!(author["description"], json!("Who wrote it"));
    assert_eq!(author["sanitize_callback"], json!("sanitize_text_field"));
    assert_eq!(
        host.meta_field("book", "book_pages").unwrap()["sanitize_callback"],
        json!("absint")
    );

    let columns = bootstrap.hooks().filter_columns("book", &host_columns());
    let layout: Vec<_> = columns
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        layout,
        vec![
            ("cb", "<input type=\"checkbox\" />"),
            ("title", "Title"),
            ("author", "Author"),
            ("date", "Date"),
        ]
    );

    host.set_meta_value(9, "book_author", json!("Ursula K. Le Guin"));
    assert_eq!(
        bootstrap
            .hooks()
            .render_column("book", "author", 9, &host)
            .as_deref(),
        Some("Ursula K. Le Guin")
    );
    assert_eq!(
        bootstrap.hooks().apply_title_filters("Add title", "book"),
        "Book title"
    );
}

#[test]
fn test_document_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("post-type.config.json");
    fs::write(&path, serde_json::to_string_pretty(&book_config()).unwrap()).unwrap();

    let resolver = ConfigResolver::new(DiscoveryPaths::new().with_stylesheet_dir(dir.path()));
    let manager = PostTypeManager::with_resolver(&resolver, None).unwrap();

    let mut host = InMemoryHost::new();
    manager.boot(&mut host).unwrap();
    assert!(host.entity("book").is_some());
    assert!(host.taxonomy("genre").is_some());
}

#[test]
fn test_explicit_path_and_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("types.yaml");
    fs::write(
        &path,
        "post_types:\n  event:\n    singular: Event\n    args:\n      menu_icon: dashicons-calendar\n",
    )
    .unwrap();

    let resolver = ConfigResolver::new(DiscoveryPaths::new());
    let mut manager =
        PostTypeManager::with_resolver(&resolver, Some(ConfigSource::from(path))).unwrap();
    manager.merge_config(
        ConfigTree::from_value(
            json!({ "post_types": { "event": { "plural": "Happenings" } } }),
            "override",
        )
        .unwrap(),
    );

    let mut host = InMemoryHost::new();
    manager.boot(&mut host).unwrap();

    let event = host.entity("event").unwrap();
    assert_eq!(event["labels"]["name"], json!("Happenings"));
    assert_eq!(event["labels"]["singular_name"], json!("Event"));
    assert_eq!(event["menu_icon"], json!("dashicons-calendar"));
}

#[test]
fn test_existing_entity_is_patched_not_registered() {
    let mut existing = Map::new();
    existing.insert("label".into(), json!("Posts"));
    existing.insert("public".into(), json!(true));
    let mut host = InMemoryHost::new().with_entity("post", existing);

    let tree = ConfigTree::from_value(
        json!({
            "post_types": {
                "post": { "singular": "Article", "args": { "menu_icon": "dashicons-media-document" } }
            }
        }),
        "inline",
    )
    .unwrap();
    let bootstrap = PostTypeManager::new(tree).boot(&mut host).unwrap();

    assert_eq!(bootstrap.plan().calls()[0].priority, PATCH_PRIORITY);
    assert_eq!(host.register_count(), 0);
    assert_eq!(host.patch_count(), 1);

    let post = host.entity("post").unwrap();
    assert_eq!(post["label"], json!("Articles"));
    assert_eq!(post["public"], json!(true));
    assert_eq!(post["menu_icon"], json!("dashicons-media-document"));
}

#[test]
fn test_references_use_registered_names() {
    let tree = ConfigTree::from_value(
        json!({
            "post_types": {
                "book": { "name": "library_book", "singular": "Book" }
            },
            "taxonomies": {
                "genre": { "name": "genre", "post_types": ["book"] }
            },
            "post_meta": {
                "book": { "meta": { "name": "isbn", "type": "string" } }
            },
            "admin_columns": {
                "book": { "show_featured_image": true, "columns": [{ "name": "isbn", "label": "ISBN" }] }
            },
            "extras": {
                "book": { "remove_meta_box": true }
            }
        }),
        "inline",
    )
    .unwrap();

    let mut host = InMemoryHost::new();
    let bootstrap = PostTypeManager::new(tree).boot(&mut host).unwrap();

    assert_eq!(bootstrap.registered_name("book"), "library_book");
    assert_eq!(host.taxonomy("genre").unwrap().object_types, vec!["library_book"]);
    assert!(host
        .meta_field("library_book", "library_book_isbn")
        .is_some());

    let columns = bootstrap
        .hooks()
        .filter_columns("library_book", &host_columns());
    assert_eq!(
        columns.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["cb", "featured_image", "title", "isbn", "date"]
    );

    host.set_meta_value(1, "library_book_isbn", json!("978-0-441-47812-5"));
    assert_eq!(
        bootstrap
            .hooks()
            .render_column("library_book", "isbn", 1, &host)
            .as_deref(),
        Some("978-0-441-47812-5")
    );
    assert_eq!(
        bootstrap
            .hooks()
            .render_column("library_book", "featured_image", 1, &host)
            .as_deref(),
        Some("—")
    );

    bootstrap.hooks().run_admin_menu(&mut host);
    assert_eq!(host.removed_panels()[0].entity, "library_book");
    assert_eq!(
        bootstrap.hooks().admin_head(),
        "<style>.column-featured_image { width: 60px; }</style>"
    );
}

#[test]
fn test_scheduler_matches_direct_run() {
    let tree = ConfigTree::from_value(book_config(), "inline").unwrap();

    let mut direct = InMemoryHost::new();
    PostTypeManager::new(tree.clone())
        .boot(&mut direct)
        .unwrap();

    let mut deferred = InMemoryHost::new();
    let mut bootstrap = PostTypeManager::new(tree).init(&deferred);
    let mut scheduler = ManualScheduler::new();
    bootstrap.schedule_on(&mut scheduler);

    assert_eq!(scheduler.pending_for(LifecycleEvent::RestApiInit), 2);
    scheduler.fire(LifecycleEvent::Init, &mut deferred).unwrap();
    scheduler
        .fire(LifecycleEvent::RestApiInit, &mut deferred)
        .unwrap();
    assert!(scheduler.is_empty());

    assert_eq!(direct.calls(), deferred.calls());
    let meta_calls = deferred
        .calls()
        .iter()
        .filter(|c| matches!(c, RecordedCall::RegisterMetaField { .. }))
        .count();
    assert_eq!(meta_calls, 4);
}

#[test]
fn test_malformed_document_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("post-type.config.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let resolver = ConfigResolver::new(DiscoveryPaths::new());
    let err = PostTypeManager::with_resolver(&resolver, Some(path.into())).unwrap_err();
    assert!(matches!(err, posttypes::Error::Config(_)));
}
