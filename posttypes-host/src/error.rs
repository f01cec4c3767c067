//! Error types surfaced by a host platform

use thiserror::Error;

/// Result type for host calls
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Failures reported by the host while applying a registration call.
///
/// posttypes does not recover from these; they are handed back to whoever
/// drives the registration plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// A patch targeted an entity the host does not know about
    #[error("entity not registered: {name}")]
    EntityNotFound { name: String },

    /// The host refused the registration outright
    #[error("host rejected '{name}': {message}")]
    Rejected { name: String, message: String },
}
