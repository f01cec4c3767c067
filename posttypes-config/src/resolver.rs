//! Configuration source selection

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::discovery::DiscoveryPaths;
use crate::error::ConfigResult;
use crate::provider::load_document;
use crate::tree::ConfigTree;

/// Where a configuration tree comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// A document on disk
    Path(PathBuf),
    /// An already-structured tree, used as-is
    Tree(ConfigTree),
}

impl From<ConfigTree> for ConfigSource {
    fn from(tree: ConfigTree) -> Self {
        Self::Tree(tree)
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Resolves a [`ConfigSource`] (or its absence) into a [`ConfigTree`].
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    paths: DiscoveryPaths,
}

impl ConfigResolver {
    pub fn new(paths: DiscoveryPaths) -> Self {
        Self { paths }
    }

    /// Resolver whose discovery directories come from `POSTTYPES_*` variables.
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self::new(DiscoveryPaths::from_env()?))
    }

    pub fn paths(&self) -> &DiscoveryPaths {
        &self.paths
    }

    /// Produce the configuration tree for `source`.
    ///
    /// - a tree is returned unchanged
    /// - an existing path is loaded; parse failures are fatal
    /// - a path that does not exist, or no source at all, falls back to
    ///   discovery; finding nothing yields an empty tree
    pub fn resolve(&self, source: Option<ConfigSource>) -> ConfigResult<ConfigTree> {
        match source {
            Some(ConfigSource::Tree(tree)) => {
                debug!("Using structured configuration");
                Ok(tree)
            }
            Some(ConfigSource::Path(path)) if path.is_file() => {
                info!("Loading configuration from {}", path.display());
                load_document(&path)
            }
            Some(ConfigSource::Path(path)) => {
                warn!(
                    "Configuration file {} not found, searching default locations",
                    path.display()
                );
                self.discover()
            }
            None => self.discover(),
        }
    }

    /// Load the first default document found, or an empty tree.
    pub fn discover(&self) -> ConfigResult<ConfigTree> {
        match self.paths.find_existing() {
            Some(path) => {
                info!("Loading default configuration from {}", path.display());
                load_document(&path)
            }
            None => Ok(ConfigTree::new()),
        }
    }
}
