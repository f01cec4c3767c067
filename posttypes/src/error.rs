//! Error types for the registration orchestrator

use posttypes_config::ConfigError;
use posttypes_host::HostError;
use thiserror::Error;

/// Result type for orchestrator operations
pub type Result<T> = std::result::Result<T, Error>;

/// An internal key was bound twice to different registered names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("key '{key}' is already bound to '{existing}', cannot rebind to '{requested}'")]
pub struct NameConflict {
    pub key: String,
    pub existing: String,
    pub requested: String,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded; nothing was registered
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The host failed while applying a scheduled call
    #[error(transparent)]
    Host(#[from] HostError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let err = NameConflict {
            key: "book".into(),
            existing: "book".into(),
            requested: "novel".into(),
        };
        assert_eq!(
            err.to_string(),
            "key 'book' is already bound to 'book', cannot rebind to 'novel'"
        );
    }

    #[test]
    fn test_host_error_passes_through() {
        let err: Error = HostError::EntityNotFound {
            name: "book".into(),
        }
        .into();
        assert_eq!(err.to_string(), "entity not registered: book");
    }
}
