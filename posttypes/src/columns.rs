//! Admin listing columns.
//!
//! [`AdminColumns`] holds the resolved column layout for one record type. The
//! host passes its own column list through [`AdminColumns::augment`] and asks
//! [`AdminColumns::render_cell`] for the content of the columns added here.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use posttypes_config::AdminColumnsDef;
use posttypes_host::{ContentSource, ItemId};

use crate::names::NameTable;
use crate::naming::column_label;

pub const CHECKBOX_COLUMN: &str = "cb";
pub const TITLE_COLUMN: &str = "title";
pub const DATE_COLUMN: &str = "date";
pub const FEATURED_IMAGE_COLUMN: &str = "featured_image";
pub const FEATURED_IMAGE_LABEL: &str = "Image";
pub const FEATURED_IMAGE_WIDTH: &str = "60px";
/// Width and height of the thumbnail shown in the featured image column
pub const THUMBNAIL_SIZE: (u32, u32) = (50, 50);
/// Featured image cell content for items without a thumbnail
pub const MISSING_IMAGE: &str = "—";
/// Keys placed by [`AdminColumns::augment`] itself, never taken by a custom column
pub const RESERVED_COLUMNS: [&str; 4] = [
    CHECKBOX_COLUMN,
    FEATURED_IMAGE_COLUMN,
    TITLE_COLUMN,
    DATE_COLUMN,
];

/// Column key → header label, in display order.
pub type ColumnList = IndexMap<String, String>;

/// Renders the cell of a custom column for one item.
pub type ColumnCallback = Arc<dyn Fn(ItemId) -> String + Send + Sync>;

/// Column callbacks registered by name, referenced from configuration.
#[derive(Clone, Default)]
pub struct ColumnCallbacks {
    callbacks: HashMap<String, ColumnCallback>,
}

impl ColumnCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(ItemId) -> String + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(callback));
    }

    pub fn get(&self, name: &str) -> Option<&ColumnCallback> {
        self.callbacks.get(name)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for ColumnCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.callbacks.keys().collect();
        names.sort();
        f.debug_struct("ColumnCallbacks")
            .field("names", &names)
            .finish()
    }
}

/// Where the content of a cell comes from.
#[derive(Clone)]
pub enum CellSource {
    Callback(ColumnCallback),
    /// Stored value of the named meta field, HTML-escaped
    MetaLookup(String),
    FeaturedImage,
    Empty,
}

impl fmt::Debug for CellSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::MetaLookup(key) => f.debug_tuple("MetaLookup").field(key).finish(),
            Self::FeaturedImage => f.write_str("FeaturedImage"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
    /// CSS width emitted by [`AdminColumns::inline_styles`]
    pub width: Option<String>,
    pub source: CellSource,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, source: CellSource) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            source,
        }
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    fn featured_image() -> Self {
        Self::new(
            FEATURED_IMAGE_COLUMN,
            FEATURED_IMAGE_LABEL,
            CellSource::FeaturedImage,
        )
        .with_width(FEATURED_IMAGE_WIDTH)
    }
}

/// Resolved column layout of one record type.
#[derive(Debug, Clone)]
pub struct AdminColumns {
    entity: String,
    featured: Option<ColumnSpec>,
    columns: Vec<ColumnSpec>,
}

impl AdminColumns {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            featured: None,
            columns: Vec::new(),
        }
    }

    pub fn with_featured_image(mut self) -> Self {
        self.featured = Some(ColumnSpec::featured_image());
        self
    }

    /// Append a custom column. A column whose key is already present, or
    /// that uses one of the [`RESERVED_COLUMNS`], is ignored.
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        if RESERVED_COLUMNS.contains(&column.key.as_str()) {
            debug!(entity = %self.entity, column = %column.key, "ignoring custom column with reserved key");
        } else if self.columns.iter().any(|c| c.key == column.key) {
            debug!(entity = %self.entity, column = %column.key, "ignoring duplicate column");
        } else {
            self.columns.push(column);
        }
        self
    }

    /// Build the layout declared under `key`. The owning entity resolves
    /// through `names`, and callback references through `callbacks`.
    pub fn from_def(
        key: &str,
        def: &AdminColumnsDef,
        names: &NameTable,
        callbacks: &ColumnCallbacks,
    ) -> Self {
        let entity = names.resolve(key).to_string();
        let mut layout = Self::new(entity.clone());
        if def.show_featured_image {
            layout = layout.with_featured_image();
        }

        for column in &def.columns {
            let name = column.name.as_deref().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                debug!(entity = %entity, "skipping admin column without a name");
                continue;
            }

            let label = column
                .label
                .clone()
                .unwrap_or_else(|| column_label(name));
            let callback = column.callback.as_deref().and_then(|callback| {
                let found = callbacks.get(callback).cloned();
                if found.is_none() {
                    warn!(
                        entity = %entity,
                        column = name,
                        callback,
                        "unknown column callback, falling back to meta lookup"
                    );
                }
                found
            });
            let source = match (callback, column.meta_key.as_deref()) {
                (Some(callback), _) => CellSource::Callback(callback),
                (None, Some("")) => CellSource::Empty,
                (None, Some(meta_key)) => CellSource::MetaLookup(meta_key.to_string()),
                (None, None) => CellSource::MetaLookup(format!("{entity}_{name}")),
            };

            let mut spec = ColumnSpec::new(name, label, source);
            spec.width = column.width.clone();
            layout = layout.with_column(spec);
        }
        layout
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn has_featured_image(&self) -> bool {
        self.featured.is_some()
    }

    /// Custom columns in declaration order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// A column added by this layout, featured image included.
    pub fn column(&self, key: &str) -> Option<&ColumnSpec> {
        self.featured
            .iter()
            .chain(self.columns.iter())
            .find(|c| c.key == key)
    }

    /// Reorder the host's column list: checkbox, featured image, title,
    /// custom columns, the remaining host columns, and date last. Columns the
    /// host does not provide are not invented, and no key appears twice.
    pub fn augment(&self, input: &ColumnList) -> ColumnList {
        let mut output = ColumnList::with_capacity(input.len() + self.columns.len() + 1);
        let mut emit = |key: &str, label: &str| {
            if !output.contains_key(key) {
                output.insert(key.to_string(), label.to_string());
            }
        };

        if let Some(label) = input.get(CHECKBOX_COLUMN) {
            emit(CHECKBOX_COLUMN, label);
        }
        if let Some(featured) = &self.featured {
            emit(&featured.key, &featured.label);
        }
        if let Some(label) = input.get(TITLE_COLUMN) {
            emit(TITLE_COLUMN, label);
        }
        for column in &self.columns {
            emit(&column.key, &column.label);
        }
        for (key, label) in input {
            if key != DATE_COLUMN {
                emit(key, label);
            }
        }
        if let Some(label) = input.get(DATE_COLUMN) {
            emit(DATE_COLUMN, label);
        }
        output
    }

    /// Cell content for `column` of `item`, or `None` when the column is not
    /// one of ours or has nothing to show.
    pub fn render_cell<C: ContentSource + ?Sized>(
        &self,
        column: &str,
        item: ItemId,
        content: &C,
    ) -> Option<String> {
        let spec = self.column(column)?;
        match &spec.source {
            CellSource::FeaturedImage => {
                let (width, height) = THUMBNAIL_SIZE;
                Some(
                    content
                        .render_thumbnail(item, width, height)
                        .unwrap_or_else(|| MISSING_IMAGE.to_string()),
                )
            }
            CellSource::Callback(callback) => Some(callback(item)),
            CellSource::MetaLookup(meta_key) => {
                let text = match content.meta_value(item, meta_key) {
                    Value::Null => return None,
                    Value::String(text) => text,
                    Value::Bool(flag) => flag.to_string(),
                    other => other.to_string(),
                };
                Some(html_escape::encode_safe(&text).into_owned())
            }
            CellSource::Empty => None,
        }
    }

    /// `<style>` block with the declared column widths.
    pub fn inline_styles(&self) -> String {
        let mut css = String::from("<style>");
        for column in self.featured.iter().chain(self.columns.iter()) {
            if let Some(width) = &column.width {
                css.push_str(&format!(".column-{} {{ width: {}; }}", column.key, width));
            }
        }
        css.push_str("</style>");
        css
    }
}
