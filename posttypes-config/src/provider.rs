//! Reading configuration documents from disk

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};
use crate::tree::ConfigTree;

/// Configuration document format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON format (.json extension, and anything unrecognised)
    Json,
    /// YAML format (.yaml or .yml extensions)
    Yaml,
}

impl DocumentFormat {
    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Load and parse a single configuration document.
///
/// An empty document is an empty tree. A document that does not parse, or
/// whose root is not a mapping, is a fatal [`ConfigError`].
pub fn load_document(path: &Path) -> ConfigResult<ConfigTree> {
    let format = DocumentFormat::from_path(path);
    trace!("Loading config file: {} ({:?})", path.display(), format);

    let content = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value = if content.trim().is_empty() {
        Value::Null
    } else {
        match format {
            DocumentFormat::Json => {
                serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            DocumentFormat::Yaml => {
                serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        }
    };

    let tree = ConfigTree::from_value(value, &path.display().to_string())?;
    debug!(
        "Loaded configuration from {} with {} sections",
        path.display(),
        tree.as_map().len()
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("a/post-type.config.json")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("types.YML")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("types.yaml")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("no-extension")),
            DocumentFormat::Json
        );
    }

    #[test]
    fn yaml_document_keeps_key_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.yaml");
        fs::write(
            &path,
            "post_types:\n  zebra:\n    singular: Zebra\n  apple:\n    singular: Apple\n",
        )
        .unwrap();

        let tree = load_document(&path).unwrap();
        let keys: Vec<_> = tree
            .section("post_types")
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["zebra", "apple"]);
    }

    #[test]
    fn empty_document_is_empty_tree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("post-type.config.json");
        fs::write(&path, "  \n").unwrap();
        assert!(load_document(&path).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("post-type.config.json");
        fs::write(&path, r#"{"post_types": {"book": }"#).unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("Invalid JSON configuration"));
    }

    #[test]
    fn scalar_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("post-type.config.json");
        fs::write(&path, "42").unwrap();
        assert!(matches!(
            load_document(&path).unwrap_err(),
            ConfigError::InvalidRoot { found: "number", .. }
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_document(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
