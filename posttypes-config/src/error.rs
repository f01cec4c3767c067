//! Error types for the posttypes configuration system

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Fatal configuration errors. Any of these aborts initialization before a
/// single registration is scheduled.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Document is not well-formed JSON
    #[error("Invalid JSON configuration in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Document is not well-formed YAML
    #[error("Invalid YAML configuration in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    /// Document parsed, but its root is not a mapping
    #[error("Configuration root in {origin} must be a mapping, found {found}")]
    InvalidRoot { origin: String, found: &'static str },

    /// Discovery settings could not be extracted from the environment
    #[error("Failed to read discovery settings: {source}")]
    Settings { source: Box<figment::Error> },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Settings {
            source: Box::new(error),
        }
    }
}

/// Which section a definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    RecordType,
    Taxonomy,
    MetaField,
    AdminColumns,
    Extras,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RecordType => "Record type",
            Self::Taxonomy => "Taxonomy",
            Self::MetaField => "Meta field",
            Self::AdminColumns => "Admin columns",
            Self::Extras => "Extras",
        })
    }
}

/// A single definition that cannot be registered. Recoverable: the entry is
/// logged and skipped while its siblings proceed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// The definition has no usable name
    #[error("{kind} name is required for key '{key}'")]
    MissingName { kind: DefinitionKind, key: String },

    /// The entry does not have the expected shape
    #[error("{kind} definition '{key}' is malformed: {message}")]
    Malformed {
        kind: DefinitionKind,
        key: String,
        message: String,
    },

    /// The key is already bound to a different registered name
    #[error("{kind} definition '{key}' conflicts with an earlier binding: {message}")]
    Conflict {
        kind: DefinitionKind,
        key: String,
        message: String,
    },
}

impl DefinitionError {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::MissingName { kind, .. }
            | Self::Malformed { kind, .. }
            | Self::Conflict { kind, .. } => *kind,
        }
    }

    /// Internal key of the offending entry.
    pub fn key(&self) -> &str {
        match self {
            Self::MissingName { key, .. }
            | Self::Malformed { key, .. }
            | Self::Conflict { key, .. } => key,
        }
    }
}
