//! Default configuration document discovery
//!
//! When no source is supplied, three locations are probed in a fixed order
//! and the first existing file wins:
//!
//! 1. `<stylesheet_dir>/post-type.config.json` (active child theme)
//! 2. `<template_dir>/post-type.config.json` (parent theme)
//! 3. `<package_dir>/post-type.config.json` (the package itself)
//!
//! Each directory defaults to the current directory and can be set from the
//! environment with the `POSTTYPES_` prefix, e.g. `POSTTYPES_STYLESHEET_DIR`.

use figment::{providers::Env, Figment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::ConfigResult;

/// File name probed in every discovery directory
pub const DEFAULT_CONFIG_FILE: &str = "post-type.config.json";

/// Environment prefix for discovery settings
pub const ENV_PREFIX: &str = "POSTTYPES_";

/// Directories searched for a default configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryPaths {
    pub stylesheet_dir: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub package_dir: Option<PathBuf>,
}

impl DiscoveryPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read directory overrides from `POSTTYPES_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        let paths: Self = Figment::new().merge(Env::prefixed(ENV_PREFIX)).extract()?;
        debug!(?paths, "loaded discovery paths from environment");
        Ok(paths)
    }

    pub fn with_stylesheet_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stylesheet_dir = Some(dir.into());
        self
    }

    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    pub fn with_package_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.package_dir = Some(dir.into());
        self
    }

    /// The three candidate documents, in probe order.
    pub fn candidates(&self) -> [PathBuf; 3] {
        let current = Path::new(".");
        [
            &self.stylesheet_dir,
            &self.template_dir,
            &self.package_dir,
        ]
        .map(|dir| {
            dir.as_deref()
                .unwrap_or(current)
                .join(DEFAULT_CONFIG_FILE)
        })
    }

    /// First candidate that exists as a file.
    pub fn find_existing(&self) -> Option<PathBuf> {
        let found = self.candidates().into_iter().find(|candidate| {
            trace!("Probing config candidate: {}", candidate.display());
            candidate.is_file()
        });
        match &found {
            Some(path) => debug!("Found default configuration: {}", path.display()),
            None => debug!("No default configuration found"),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn candidates_are_in_fixed_order() {
        let paths = DiscoveryPaths::new()
            .with_stylesheet_dir("/child")
            .with_template_dir("/parent")
            .with_package_dir("/package");

        assert_eq!(
            paths.candidates(),
            [
                PathBuf::from("/child/post-type.config.json"),
                PathBuf::from("/parent/post-type.config.json"),
                PathBuf::from("/package/post-type.config.json"),
            ]
        );
    }

    #[test]
    fn unset_directories_fall_back_to_current_dir() {
        let paths = DiscoveryPaths::new().with_template_dir("/parent");
        let candidates = paths.candidates();
        assert_eq!(candidates[0], Path::new(".").join(DEFAULT_CONFIG_FILE));
        assert_eq!(candidates[1], PathBuf::from("/parent/post-type.config.json"));
    }

    #[test]
    fn first_existing_candidate_wins() {
        let child = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        let package = TempDir::new().unwrap();
        fs::write(parent.path().join(DEFAULT_CONFIG_FILE), "{}").unwrap();
        fs::write(package.path().join(DEFAULT_CONFIG_FILE), "{}").unwrap();

        let paths = DiscoveryPaths::new()
            .with_stylesheet_dir(child.path())
            .with_template_dir(parent.path())
            .with_package_dir(package.path());

        assert_eq!(
            paths.find_existing(),
            Some(parent.path().join(DEFAULT_CONFIG_FILE))
        );
    }

    #[test]
    #[serial]
    fn directories_from_environment() {
        std::env::set_var("POSTTYPES_STYLESHEET_DIR", "/srv/theme-child");
        std::env::set_var("POSTTYPES_PACKAGE_DIR", "/srv/plugin");

        let paths = DiscoveryPaths::from_env();

        std::env::remove_var("POSTTYPES_STYLESHEET_DIR");
        std::env::remove_var("POSTTYPES_PACKAGE_DIR");

        let paths = paths.unwrap();
        assert_eq!(paths.stylesheet_dir, Some(PathBuf::from("/srv/theme-child")));
        assert_eq!(paths.template_dir, None);
        assert_eq!(paths.package_dir, Some(PathBuf::from("/srv/plugin")));
    }
}
