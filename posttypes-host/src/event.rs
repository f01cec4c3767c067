//! Lifecycle events and callback priorities

use serde::Serialize;
use std::fmt;

/// Ordering key for callbacks attached to the same event. Lower runs first.
pub type Priority = i32;

/// Priority used when a caller has no ordering requirement.
pub const DEFAULT_PRIORITY: Priority = 10;

/// Host lifecycle points at which registration work may run.
///
/// Variants are declared in the order a host fires them during bootstrap, so
/// the derived `Ord` doubles as the execution order for synchronous plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Main initialization; entity registry mutations are legal here
    Init,
    /// REST layer initialization
    RestApiInit,
}

impl LifecycleEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::RestApiInit => "rest_api_init",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
